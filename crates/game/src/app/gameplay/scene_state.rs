/// The playable level: one stretch of street, five Grimeys, then the boss.
///
/// Gameplay state lives in `actors`, keyed by the entity that carries the
/// actor's position, collider and graphic.
pub(crate) struct LevelScene {
    context: GameContext,
    actors: HashMap<EntityId, Actor>,
    director: EnemyDirector,
    state: WorldState,
    player_id: Option<EntityId>,
    hud_id: Option<EntityId>,
    layers: Vec<ParallaxLayer>,
    intro: Option<BossIntro>,
    rig: CameraRig,
    rng: StdRng,
    seed: u64,
    audio: LogAudioSink,
}

impl LevelScene {
    pub(crate) fn new(context: GameContext) -> Self {
        let seed = context.settings.seed.unwrap_or_else(rand::random);
        let director = EnemyDirector::new(context.settings.max_threat);
        let rig = CameraRig::new(0.0, &context.settings);
        Self {
            context,
            actors: HashMap::new(),
            director,
            state: WorldState::default(),
            player_id: None,
            hud_id: None,
            layers: Vec::new(),
            intro: None,
            rig,
            rng: StdRng::seed_from_u64(seed),
            seed,
            audio: LogAudioSink::default(),
        }
    }

    fn settings(&self) -> &Settings {
        &self.context.settings
    }

    fn populate(&mut self, world: &mut SceneWorld) -> Result<(), GameplayError> {
        let (view_width, _) = world.viewport();
        let view_width = view_width as f64;
        let assets = Arc::clone(&self.context.assets);

        self.layers = spawn_backdrop(world, &assets)?;

        let spawn = Vec2::new(view_width * 0.5, floor_middle());
        let player_id = world.spawn(character_desc(
            &assets,
            PLAYER_SHEET,
            spawn,
            player_sprite()?,
            PLAYER_COLLIDER,
        )?);
        self.enlist(player_id, Actor::Player(PlayerActor::new(self.settings().invincible)))?;
        self.player_id = Some(player_id);
        self.rig = CameraRig::new(spawn.x, self.settings());
        self.hud_id = Some(spawn_hud(world, PLAYER_MAX_HEALTH, MAX_BUBBLES));

        let spacing = ((LEVEL_LENGTH - view_width) / GRIMEY_COUNT as f64).max(2.0);
        for index in 0..GRIMEY_COUNT {
            let x = view_width + index as f64 * spacing + self.rng.random_range(0.0..spacing * 0.5);
            let y = self.rng.random_range(FLOOR_TOP..=FLOOR_BOTTOM);
            let id = world.spawn(character_desc(
                &assets,
                GRIMEY_SHEET,
                Vec2::new(x, y),
                enemy_sprite(ActorKind::Grimey)?,
                GRIMEY_COLLIDER,
            )?);
            let mut grimey = EnemyActor::grimey(self.settings().enemy_health);
            grimey.body.facing_left = true;
            self.enlist(id, Actor::Grimey(grimey))?;
        }

        info!(
            seed = self.seed,
            grimeys = GRIMEY_COUNT,
            max_threat = self.director.max_points(),
            "level_populated"
        );
        Ok(())
    }

    /// Tracks a character and offers it to the director.
    fn enlist(&mut self, id: EntityId, actor: Actor) -> Result<(), GameplayError> {
        self.director.register(id, actor.threat_points())?;
        self.actors.insert(id, actor);
        Ok(())
    }

    fn tick(&mut self, input: &InputSnapshot, world: &mut SceneWorld) -> Result<(), GameplayError> {
        self.update_director(world);
        self.update_actors(input, world)?;
        self.actors.retain(|id, _| world.is_attached(*id));
        self.update_stage(input, world)?;
        self.check_outcome();
        Ok(())
    }

    fn update_director(&mut self, world: &SceneWorld) {
        let Some(player) = self.player_position(world) else {
            return;
        };
        let actors = &self.actors;
        self.director.update(
            player,
            |id| position_of(world, id),
            |id| actors.get(&id).map_or(true, Actor::is_dead),
        );
    }

    /// Each actor is taken out of the map while it updates so it can touch
    /// other actors.
    fn update_actors(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        world.for_each_attached(|world, id| {
            let Some(mut actor) = self.actors.remove(&id) else {
                return Ok(());
            };
            let result = self.update_actor(&mut actor, id, input, world);
            self.actors.insert(id, actor);
            result
        })
    }

    fn update_stage(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        if self.settings().show_camera {
            if input.key_pressed(&Key::Q) {
                self.rig.steer(-1.0);
            }
            if input.key_pressed(&Key::E) {
                self.rig.steer(1.0);
            }
        }
        if let Some(player) = self.player_position(world) {
            self.rig.follow(player.x);
        }
        let view_width = world.viewport().0 as f64;
        world.camera_mut().x = self
            .state
            .room_start
            .unwrap_or_else(|| self.rig.camera_x(view_width));
        sync_parallax(world, &self.layers);

        if let (Some(hud), Some(Actor::Player(player))) = (
            self.hud_id,
            self.player_id.and_then(|id| self.actors.get(&id)),
        ) {
            sync_hud(world, hud, player);
        }

        self.update_boss_intro(world)
    }

    fn update_boss_intro(&mut self, world: &mut SceneWorld) -> Result<(), GameplayError> {
        if self.state.boss.is_some() {
            return Ok(());
        }
        if self.intro.is_none() {
            let grimeys_left = self
                .actors
                .values()
                .any(|actor| matches!(actor, Actor::Grimey(enemy) if !enemy.body.dead));
            if grimeys_left {
                return Ok(());
            }
            self.intro = Some(BossIntro::spawn(world, self.settings().hide_overlay));
        }

        let shown = self
            .intro
            .as_mut()
            .is_some_and(|intro| intro.advance(world));
        if shown {
            self.spawn_boss(world)?;
        }
        Ok(())
    }

    /// Locks the screen where it stands and drops the boss into the room.
    fn spawn_boss(&mut self, world: &mut SceneWorld) -> Result<(), GameplayError> {
        let view_width = world.viewport().0 as f64;
        let room = world.camera().x;
        self.state.room_start = Some(room);
        self.state.bounds_x = Some((
            room + BOSS_ROOM_MARGIN,
            room + view_width - BOSS_ROOM_MARGIN,
        ));

        let assets = Arc::clone(&self.context.assets);
        let id = world.spawn(character_desc(
            &assets,
            BOSS_SHEET,
            Vec2::new(room + view_width * 0.75, floor_middle()),
            enemy_sprite(ActorKind::Boss)?,
            BOSS_COLLIDER,
        )?);
        let mut boss = EnemyActor::boss(self.settings().enemy_health);
        boss.body.facing_left = true;
        self.enlist(id, Actor::Boss(boss))?;
        self.state.boss = Some(id);

        let leftovers: Vec<EntityId> = self
            .actors
            .iter()
            .filter(|(_, actor)| actor.kind() == ActorKind::Grimey)
            .map(|(id, _)| *id)
            .collect();
        for leftover in leftovers {
            world.remove_entity(leftover);
            self.director.unregister(leftover);
            self.actors.remove(&leftover);
        }
        if let Some(intro) = self.intro.take() {
            world.remove_entity(intro.id);
        }

        info!(entity = id.0, room_x = room, "boss_spawned");
        Ok(())
    }

    fn check_outcome(&mut self) {
        if self.state.outcome.is_some() {
            return;
        }
        let player_gone = match self.player_id.and_then(|id| self.actors.get(&id)) {
            Some(Actor::Player(player)) => player.body.dead && player.body.death_ticks == 0,
            _ => true,
        };
        let boss_beaten = self
            .state
            .boss
            .is_some_and(|boss| !self.actors.contains_key(&boss));

        let outcome = if player_gone {
            Outcome::Defeat
        } else if boss_beaten {
            Outcome::Victory
        } else {
            return;
        };
        self.state.outcome = Some(outcome);
        info!(outcome = outcome.banner(), seed = self.seed, "level_outcome");
    }

    /// Pushes the results card once the level is decided.
    fn take_outcome_command(&mut self) -> SceneCommand {
        match self.state.outcome {
            Some(outcome) if !self.state.results_pushed => {
                self.state.results_pushed = true;
                SceneCommand::Push(Box::new(ResultsScene::new(outcome.banner())))
            }
            _ => SceneCommand::None,
        }
    }

    fn walk_bounds(&self, world: &SceneWorld) -> (f64, f64) {
        self.state.walk_bounds(world.viewport().0 as f64)
    }

    fn player_position(&self, world: &SceneWorld) -> Option<Vec2> {
        self.player_id.and_then(|id| position_of(world, id))
    }
}

fn floor_middle() -> f64 {
    (FLOOR_TOP + FLOOR_BOTTOM) * 0.5
}

impl From<GameplayError> for SceneError {
    fn from(error: GameplayError) -> Self {
        match error {
            GameplayError::Asset(source) => SceneError::Asset(source),
            GameplayError::Sprite(source) => SceneError::Sprite(source),
            other => SceneError::custom(LEVEL_SCENE_NAME, other),
        }
    }
}
