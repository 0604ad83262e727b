    use super::*;

    fn seeded_settings() -> Settings {
        Settings {
            seed: Some(7),
            ..Settings::default()
        }
    }

    fn level(settings: Settings) -> (LevelScene, SceneWorld) {
        (
            LevelScene::new(GameContext::for_tests(settings)),
            SceneWorld::with_viewport(480, 270),
        )
    }

    fn loaded_level(settings: Settings) -> (LevelScene, SceneWorld) {
        let (mut scene, mut world) = level(settings);
        scene.load(&mut world).expect("level loads");
        world.apply_pending();
        (scene, world)
    }

    fn place(
        scene: &mut LevelScene,
        world: &mut SceneWorld,
        actor: Actor,
        position: Vec2,
    ) -> EntityId {
        let (sheet, sprite, collider) = match actor.kind() {
            ActorKind::Player => (PLAYER_SHEET, player_sprite(), PLAYER_COLLIDER),
            ActorKind::Boss => (BOSS_SHEET, enemy_sprite(ActorKind::Boss), BOSS_COLLIDER),
            _ => (GRIMEY_SHEET, enemy_sprite(ActorKind::Grimey), GRIMEY_COLLIDER),
        };
        let assets = Arc::clone(&scene.context.assets);
        let desc = character_desc(&assets, sheet, position, sprite.expect("sprite"), collider)
            .expect("character desc");
        let id = world.spawn(desc);
        scene.enlist(id, actor).expect("enlist");
        id
    }

    fn health_of(scene: &LevelScene, id: EntityId) -> u32 {
        scene
            .actors
            .get(&id)
            .and_then(Actor::body)
            .map(|body| body.health)
            .expect("character actor")
    }

    fn step(scene: &mut LevelScene, world: &mut SceneWorld, input: &InputSnapshot) -> SceneCommand {
        let command = scene.update(input, world).expect("level update");
        world.apply_pending();
        command
    }

    /// Spawns a hitbox the way a swing does: claimed by its owner, which
    /// restarts "punch". The hitbox actor is returned out of the map.
    fn start_punch(
        scene: &mut LevelScene,
        world: &mut SceneWorld,
        owner: EntityId,
    ) -> (EntityId, HitboxActor) {
        let (team, damage) = match scene.actors.get(&owner) {
            Some(Actor::Player(_)) => (Team::Hero, PUNCH_DAMAGE),
            _ => (Team::Grime, GRIMEY_PUNCH_DAMAGE),
        };
        let body = Character::new(team, PLAYER_MAX_HEALTH);
        let hitbox_id = scene
            .spawn_hitbox(world, owner, team, damage, &body)
            .expect("hitbox spawned");
        match scene.actors.get_mut(&owner) {
            Some(Actor::Player(player)) => player.hitbox = Some(hitbox_id),
            Some(Actor::Grimey(enemy)) | Some(Actor::Boss(enemy)) => {
                enemy.hitbox = Some(hitbox_id);
                enemy.state = EnemyState::Attack;
            }
            other => panic!("unexpected owner {other:?}"),
        }
        restart_animation(world, owner, "punch").expect("punch");
        world.apply_pending();
        let Some(Actor::Hitbox(hitbox)) = scene.actors.remove(&hitbox_id) else {
            panic!("hitbox actor missing");
        };
        (hitbox_id, hitbox)
    }

    fn line_offsets() -> Vec<Vec2> {
        vec![
            Vec2::new(-30.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(0.0, -30.0),
            Vec2::new(0.0, 30.0),
        ]
    }

    #[test]
    fn director_admits_enemies_until_the_threat_budget_is_spent() {
        let mut director = EnemyDirector::with_offsets(3, line_offsets());
        let (a, b, c) = (EntityId(1), EntityId(2), EntityId(3));
        assert_eq!(director.register(a, Some(1)), Ok(true));
        assert_eq!(director.register(b, Some(2)), Ok(true));
        assert_eq!(director.register(c, Some(1)), Ok(true));

        director.update(Vec2::ZERO, |_| Some(Vec2::new(100.0, 0.0)), |_| false);

        assert!(director.slot_of(a).is_some());
        assert!(director.slot_of(b).is_some());
        assert_eq!(director.slot_of(c), None);
        assert_eq!(director.current_points(), 3);
        assert_eq!(director.max_points(), 3);
    }

    #[test]
    fn director_skips_the_player_sentinel_and_rejects_bad_points() {
        let mut director = EnemyDirector::new(3);
        let id = EntityId(4);
        assert_eq!(director.register(id, Some(PLAYER_THREAT_POINTS)), Ok(false));
        assert!(!director.is_registered(id));
        assert_eq!(
            director.register(id, None),
            Err(DirectorError::MissingPoints { id })
        );
        assert_eq!(
            director.register(id, Some(-3)),
            Err(DirectorError::InvalidPoints { id, points: -3 })
        );

        assert_eq!(director.register(id, Some(1)), Ok(true));
        assert_eq!(director.register(id, Some(1)), Ok(false));
    }

    #[test]
    fn unregister_frees_the_slot_and_is_idempotent() {
        let mut director = EnemyDirector::with_offsets(3, line_offsets());
        let id = EntityId(1);
        director.register(id, Some(2)).expect("register");
        director.update(Vec2::ZERO, |_| Some(Vec2::ZERO), |_| false);
        assert_eq!(director.current_points(), 2);

        assert!(director.unregister(id));
        assert!(!director.unregister(id));
        assert_eq!(director.current_points(), 0);
        assert!(director
            .slots()
            .iter()
            .all(|slot| slot.occupant.is_none()));
    }

    #[test]
    fn dead_occupants_are_reclaimed_before_assignment() {
        let mut director = EnemyDirector::with_offsets(2, line_offsets());
        let (first, second) = (EntityId(1), EntityId(2));
        director.register(first, Some(2)).expect("register");
        director.register(second, Some(2)).expect("register");

        director.update(Vec2::ZERO, |_| Some(Vec2::ZERO), |_| false);
        assert!(director.slot_of(first).is_some());
        assert_eq!(director.slot_of(second), None);

        director.update(Vec2::ZERO, |_| Some(Vec2::ZERO), |id| id == first);
        assert!(!director.is_registered(first));
        assert!(director.slot_of(second).is_some());
    }

    #[test]
    fn candidates_take_the_nearest_free_slot_and_targets_follow_the_player() {
        let mut director = EnemyDirector::with_offsets(3, line_offsets());
        let east = EntityId(1);
        director.register(east, Some(1)).expect("register");

        director.update(Vec2::ZERO, |_| Some(Vec2::new(100.0, 5.0)), |_| false);
        assert_eq!(director.slot_of(east), Some(1));
        assert_eq!(director.target_of(east), Some(Vec2::new(30.0, 0.0)));

        director.update(Vec2::new(50.0, 50.0), |_| Some(Vec2::ZERO), |_| false);
        assert_eq!(director.target_of(east), Some(Vec2::new(80.0, 50.0)));
    }

    #[test]
    fn enemies_without_position_wait_for_a_later_tick() {
        let mut director = EnemyDirector::with_offsets(3, line_offsets());
        let id = EntityId(9);
        director.register(id, Some(1)).expect("register");
        director.update(Vec2::ZERO, |_| None, |_| false);
        assert_eq!(director.slot_of(id), None);
        director.update(Vec2::ZERO, |_| Some(Vec2::ZERO), |_| false);
        assert!(director.slot_of(id).is_some());
    }

    #[test]
    fn ring_slots_are_wider_than_tall() {
        let offsets = ring_offsets(SLOT_COUNT, SLOT_RADIUS_X, SLOT_RADIUS_Y);
        assert_eq!(offsets.len(), SLOT_COUNT);
        let max_x = offsets.iter().map(|o| o.x.abs()).fold(0.0, f64::max);
        let max_y = offsets.iter().map(|o| o.y.abs()).fold(0.0, f64::max);
        assert!((max_x - SLOT_RADIUS_X).abs() < 1e-9);
        assert!((max_y - SLOT_RADIUS_Y).abs() < 1e-9);
    }

    #[test]
    fn friction_halves_velocity_each_tick() {
        let mut body = Character::new(Team::Hero, 10);
        body.velocity = Vec2::new(10.0, 0.0);
        apply_friction(&mut body);
        assert_eq!(body.velocity, Vec2::new(5.0, 0.0));
        apply_friction(&mut body);
        assert_eq!(body.velocity, Vec2::new(2.5, 0.0));
    }

    #[test]
    fn hits_start_invincibility_and_flash_on_the_upper_half_of_each_period() {
        let mut body = Character::new(Team::Grime, 4);
        assert_eq!(hurt(&mut body, 1), HurtOutcome::Damaged);
        assert_eq!(body.health, 3);
        assert_eq!(body.inv_frames, INVINCIBILITY_TICKS);
        assert_eq!(hurt(&mut body, 1), HurtOutcome::Ignored);
        assert_eq!(body.health, 3);

        let mut flashes = Vec::new();
        while body.inv_frames > 0 {
            tick_invincibility(&mut body);
            flashes.push((body.inv_frames, body.hit_flash));
        }
        for (frames, flash) in flashes {
            assert_eq!(flash, frames > 0 && frames % 16 >= 8, "frames {frames}");
        }
        assert_eq!(hurt(&mut body, 1), HurtOutcome::Damaged);
    }

    #[test]
    fn killing_blow_clamps_health_at_zero() {
        let mut body = Character::new(Team::Grime, 2);
        assert_eq!(hurt(&mut body, 5), HurtOutcome::Killed);
        assert_eq!(body.health, 0);
        assert!(body.dead);
        assert!(!body.hit_flash);
        body.inv_frames = 0;
        assert_eq!(hurt(&mut body, 1), HurtOutcome::Ignored);
    }

    #[test]
    fn invulnerable_characters_keep_full_health() {
        let mut body = Character::new(Team::Hero, PLAYER_MAX_HEALTH);
        body.invulnerable = true;
        assert_eq!(hurt(&mut body, 50), HurtOutcome::Damaged);
        assert_eq!(body.health, PLAYER_MAX_HEALTH);
        assert!(!body.dead);
        assert_eq!(body.inv_frames, INVINCIBILITY_TICKS);
    }

    #[test]
    fn blocked_axis_steps_are_refused_per_axis() {
        let (mut scene, mut world) = level(seeded_settings());
        let walker = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(100.0, 200.0),
        );
        place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(121.0, 200.0),
        );
        world.apply_pending();

        let body = Character::new(Team::Grime, 4);
        move_character(&mut world, walker, &body, Vec2::new(5.0, 3.0), (0.0, 1_000.0));
        assert_eq!(
            world.find_entity(walker).expect("walker").position,
            Vec2::new(100.0, 203.0)
        );

        move_character(&mut world, walker, &body, Vec2::new(0.0, 500.0), (0.0, 1_000.0));
        assert_eq!(world.find_entity(walker).expect("walker").position.y, FLOOR_BOTTOM);
    }

    #[test]
    fn hitbox_only_hurts_the_other_team_while_the_owner_is_on_a_damage_frame() {
        let (mut scene, mut world) = level(seeded_settings());
        let puncher = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(100.0, 200.0),
        );
        let bystander = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(125.0, 200.0),
        );
        let player = place(
            &mut scene,
            &mut world,
            Actor::Player(PlayerActor::new(false)),
            Vec2::new(130.0, 200.0),
        );
        scene.player_id = Some(player);
        world.apply_pending();

        let (hitbox_id, mut hitbox) = start_punch(&mut scene, &mut world, puncher);

        scene
            .update_hitbox(&mut hitbox, hitbox_id, &mut world)
            .expect("update");
        let collider = world
            .find_entity(hitbox_id)
            .and_then(|entity| entity.collider.as_ref())
            .expect("collider");
        assert!(!collider.collidable);
        assert_eq!(health_of(&scene, player), PLAYER_MAX_HEALTH);

        for _ in 0..8 {
            tick_animation(&mut world, puncher);
        }
        scene
            .update_hitbox(&mut hitbox, hitbox_id, &mut world)
            .expect("update");
        assert_eq!(
            health_of(&scene, player),
            PLAYER_MAX_HEALTH - GRIMEY_PUNCH_DAMAGE
        );
        assert_eq!(health_of(&scene, bystander), 4);

        for _ in 0..24 {
            tick_animation(&mut world, puncher);
        }
        scene
            .update_hitbox(&mut hitbox, hitbox_id, &mut world)
            .expect("update");
        assert!(!world.is_attached(hitbox_id));
    }

    #[test]
    fn a_stun_before_the_damage_window_cancels_the_swing() {
        let (mut scene, mut world) = level(seeded_settings());
        let player = place(
            &mut scene,
            &mut world,
            Actor::Player(PlayerActor::new(false)),
            Vec2::new(130.0, 200.0),
        );
        let puncher = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(100.0, 200.0),
        );
        scene.player_id = Some(player);
        world.apply_pending();
        let (hitbox_id, mut hitbox) = start_punch(&mut scene, &mut world, puncher);

        if let Some(Actor::Grimey(enemy)) = scene.actors.get_mut(&puncher) {
            enemy.state = EnemyState::Stunned;
            enemy.stun_ticks = BOSS_STUN_TICKS;
        }
        restart_animation(&mut world, puncher, "stunned").expect("stunned");
        scene
            .update_hitbox(&mut hitbox, hitbox_id, &mut world)
            .expect("update");

        assert!(!world.is_attached(hitbox_id));
        match scene.actors.get(&puncher) {
            Some(Actor::Grimey(enemy)) => assert_eq!(enemy.hitbox, None),
            other => panic!("unexpected actor {other:?}"),
        }
        assert_eq!(health_of(&scene, player), PLAYER_MAX_HEALTH);
    }

    #[test]
    fn trapping_an_attacking_grimey_removes_its_hitbox() {
        let (mut scene, mut world) = level(seeded_settings());
        let player = place(
            &mut scene,
            &mut world,
            Actor::Player(PlayerActor::new(false)),
            Vec2::new(100.0, 200.0),
        );
        let grimey = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(140.0, 200.0),
        );
        world.apply_pending();
        let (hitbox_id, hitbox) = start_punch(&mut scene, &mut world, grimey);
        scene.actors.insert(hitbox_id, Actor::Hitbox(hitbox));

        let body = Character::new(Team::Hero, PLAYER_MAX_HEALTH);
        scene
            .spawn_bubble(&mut world, player, &body)
            .expect("bubble spawned");
        world.apply_pending();
        let bubble_id = scene
            .actors
            .iter()
            .find(|(_, actor)| actor.kind() == ActorKind::Bubble)
            .map(|(id, _)| *id)
            .expect("bubble actor");
        let Some(Actor::Bubble(mut bubble)) = scene.actors.remove(&bubble_id) else {
            panic!("bubble actor missing");
        };
        scene
            .update_bubble(&mut bubble, bubble_id, &mut world)
            .expect("update");

        assert_eq!(bubble.captive, Some(grimey));
        assert!(!world.is_attached(hitbox_id));
        match scene.actors.get(&grimey) {
            Some(Actor::Grimey(enemy)) => {
                assert_eq!(enemy.state, EnemyState::Trapped);
                assert_eq!(enemy.hitbox, None);
            }
            other => panic!("unexpected actor {other:?}"),
        }
    }

    #[test]
    fn killed_enemies_leave_the_director_and_linger_before_removal() {
        let (mut scene, mut world) = level(seeded_settings());
        let player = place(
            &mut scene,
            &mut world,
            Actor::Player(PlayerActor::new(false)),
            Vec2::new(100.0, 200.0),
        );
        let grimey = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(1)),
            Vec2::new(125.0, 200.0),
        );
        scene.player_id = Some(player);
        world.apply_pending();
        assert!(scene.director.is_registered(grimey));

        let (hitbox_id, mut hitbox) = start_punch(&mut scene, &mut world, player);
        for _ in 0..8 {
            tick_animation(&mut world, player);
        }
        scene
            .update_hitbox(&mut hitbox, hitbox_id, &mut world)
            .expect("update");

        assert!(!scene.director.is_registered(grimey));
        let Some(Actor::Grimey(mut enemy)) = scene.actors.remove(&grimey) else {
            panic!("grimey actor missing");
        };
        assert_eq!(enemy.state, EnemyState::Dead);
        assert_eq!(enemy.body.death_ticks, DEATH_LINGER_TICKS);
        assert!(enemy.body.velocity.x > 0.0);
        let collider = world
            .find_entity(grimey)
            .and_then(|entity| entity.collider.as_ref())
            .expect("collider");
        assert!(!collider.collidable);

        for _ in 0..DEATH_LINGER_TICKS {
            assert!(world.is_attached(grimey));
            scene
                .update_enemy(ActorKind::Grimey, &mut enemy, grimey, &mut world)
                .expect("update");
        }
        assert!(!world.is_attached(grimey));
    }

    #[test]
    fn bubbles_trap_grimeys_and_drag_them_along() {
        let (mut scene, mut world) = level(seeded_settings());
        let player = place(
            &mut scene,
            &mut world,
            Actor::Player(PlayerActor::new(false)),
            Vec2::new(100.0, 200.0),
        );
        let grimey = place(
            &mut scene,
            &mut world,
            Actor::Grimey(EnemyActor::grimey(4)),
            Vec2::new(140.0, 200.0),
        );
        world.apply_pending();

        let body = Character::new(Team::Hero, PLAYER_MAX_HEALTH);
        scene
            .spawn_bubble(&mut world, player, &body)
            .expect("bubble spawned");
        world.apply_pending();
        let bubble_id = scene
            .actors
            .iter()
            .find(|(_, actor)| actor.kind() == ActorKind::Bubble)
            .map(|(id, _)| *id)
            .expect("bubble actor");
        let Some(Actor::Bubble(mut bubble)) = scene.actors.remove(&bubble_id) else {
            panic!("bubble actor missing");
        };

        scene
            .update_bubble(&mut bubble, bubble_id, &mut world)
            .expect("update");
        assert_eq!(bubble.captive, Some(grimey));
        assert_eq!(health_of(&scene, grimey), 3);
        match scene.actors.get(&grimey) {
            Some(Actor::Grimey(enemy)) => {
                assert_eq!(enemy.state, EnemyState::Trapped);
                assert_eq!(enemy.captor, Some(bubble_id));
            }
            other => panic!("unexpected actor {other:?}"),
        }
        let scale = world
            .find_entity(grimey)
            .and_then(|entity| entity.graphic.as_ref())
            .and_then(Graphic::animated_layer)
            .map(|layer| layer.scale)
            .expect("animated layer");
        assert_eq!(scale, TRAPPED_SCALE);

        scene
            .update_bubble(&mut bubble, bubble_id, &mut world)
            .expect("update");
        let bubble_x = world.find_entity(bubble_id).expect("bubble").position.x;
        assert_eq!(world.find_entity(grimey).expect("grimey").position.x, bubble_x);
    }

    #[test]
    fn camera_rig_leads_the_target_and_turns_around_past_the_outer_edge() {
        let settings = Settings::default();
        let mut rig = CameraRig::new(240.0, &settings);
        rig.follow(240.0);
        assert_eq!(rig.x, 260.0);
        assert_eq!(rig.camera_x(480.0), 20.0);

        let mut rig = CameraRig::new(300.0, &settings);
        rig.follow(100.0);
        assert_eq!(rig.x, 300.0);
        assert_eq!(rig.dir, -1.0);

        let rig = CameraRig::new(10.0, &settings);
        assert_eq!(rig.camera_x(480.0), 0.0);
    }

    #[test]
    fn parallax_anchor_steps_by_whole_tiles() {
        let layer = ParallaxLayer {
            id: EntityId(1),
            scroll: 0.5,
            span: 100.0,
        };
        assert_eq!(layer.anchor_x(0.0), 0.0);
        assert_eq!(layer.anchor_x(199.0), 0.0);
        assert_eq!(layer.anchor_x(200.0), 100.0);
        assert_eq!(layer.anchor_x(450.0), 200.0);
    }

    #[test]
    fn level_load_spawns_the_player_and_five_registered_grimeys() {
        let (scene, world) = loaded_level(seeded_settings());
        let count = |kind: ActorKind| {
            scene
                .actors
                .values()
                .filter(|actor| actor.kind() == kind)
                .count()
        };
        assert_eq!(count(ActorKind::Player), 1);
        assert_eq!(count(ActorKind::Grimey), GRIMEY_COUNT);
        let player = scene.player_id.expect("player");
        assert!(!scene.director.is_registered(player));
        assert!(scene
            .actors
            .iter()
            .filter(|(_, actor)| actor.kind() == ActorKind::Grimey)
            .all(|(id, _)| scene.director.is_registered(*id)));
        assert!(scene.hud_id.is_some_and(|hud| world.is_renderable(hud)));
        assert_eq!(scene.layers.len(), 3);
    }

    #[test]
    fn the_same_seed_places_grimeys_identically() {
        let positions = |settings: Settings| {
            let (scene, world) = loaded_level(settings);
            let mut placed: Vec<(EntityId, Vec2)> = scene
                .actors
                .iter()
                .filter(|(_, actor)| actor.kind() == ActorKind::Grimey)
                .map(|(id, _)| (*id, world.find_entity(*id).expect("grimey").position))
                .collect();
            placed.sort_by_key(|(id, _)| id.0);
            placed.into_iter().map(|(_, position)| position).collect::<Vec<_>>()
        };
        assert_eq!(positions(seeded_settings()), positions(seeded_settings()));
    }

    #[test]
    fn hud_tracks_health_and_bubbles() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let player = scene.player_id.expect("player");
        if let Some(Actor::Player(actor)) = scene.actors.get_mut(&player) {
            actor.body.health = 7;
            actor.bubbles = 1;
        }
        step(&mut scene, &mut world, &InputSnapshot::empty());

        let hud = world
            .find_entity(scene.hud_id.expect("hud"))
            .and_then(|entity| entity.graphic.as_ref())
            .expect("hud graphic");
        let GraphicKind::List(children) = &hud.kind else {
            panic!("hud is a list");
        };
        let blocks = &children[HUD_FIRST_BLOCK..HUD_FIRST_BLOCK + PLAYER_MAX_HEALTH as usize];
        assert_eq!(blocks.iter().filter(|block| block.alpha == 1.0).count(), 7);
        let icons = &children[HUD_FIRST_BLOCK + PLAYER_MAX_HEALTH as usize..];
        assert_eq!(icons.len(), MAX_BUBBLES as usize);
        assert_eq!(icons[0].alpha, 1.0);
        assert_eq!(icons[1].alpha, HUD_BUBBLE_DIM_ALPHA);
        assert!(children.iter().all(|child| child.scroll == Vec2::ZERO));
    }

    #[test]
    fn clearing_the_grimeys_brings_in_the_boss_and_locks_the_room() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let grimeys: Vec<EntityId> = scene
            .actors
            .iter()
            .filter(|(_, actor)| actor.kind() == ActorKind::Grimey)
            .map(|(id, _)| *id)
            .collect();
        for id in grimeys {
            world.remove_entity(id);
            scene.actors.remove(&id);
        }

        step(&mut scene, &mut world, &InputSnapshot::empty());
        let intro = scene.intro.expect("boss intro started");
        assert!(world.is_renderable(intro.id));
        assert_eq!(scene.state.boss, None);

        for _ in 0..90 {
            step(&mut scene, &mut world, &InputSnapshot::empty());
        }
        let boss = scene.state.boss.expect("boss spawned");
        assert!(scene.director.is_registered(boss));
        assert!(!world.is_attached(intro.id));
        let room = world.camera().x;
        assert_eq!(scene.state.room_start, Some(room));
        assert_eq!(
            scene.state.bounds_x,
            Some((room + BOSS_ROOM_MARGIN, room + 480.0 - BOSS_ROOM_MARGIN))
        );
        match scene.actors.get(&boss) {
            Some(Actor::Boss(enemy)) => {
                assert_eq!(enemy.body.max_health, 4 * BOSS_HEALTH_MULTIPLIER);
                assert_eq!(enemy.points, BOSS_THREAT_POINTS);
            }
            other => panic!("unexpected actor {other:?}"),
        }
    }

    #[test]
    fn boss_defeat_reports_victory_once() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let grimeys: Vec<EntityId> = scene
            .actors
            .iter()
            .filter(|(_, actor)| actor.kind() == ActorKind::Grimey)
            .map(|(id, _)| *id)
            .collect();
        for id in grimeys {
            world.remove_entity(id);
            scene.actors.remove(&id);
        }
        for _ in 0..90 {
            step(&mut scene, &mut world, &InputSnapshot::empty());
        }
        let boss = scene.state.boss.expect("boss spawned");
        world.remove_entity(boss);

        match step(&mut scene, &mut world, &InputSnapshot::empty()) {
            SceneCommand::Push(results) => assert_eq!(results.name(), "results"),
            other => panic!("expected results push, got {other:?}"),
        }
        assert_eq!(scene.state.outcome, Some(Outcome::Victory));
        assert!(matches!(
            step(&mut scene, &mut world, &InputSnapshot::empty()),
            SceneCommand::None
        ));
    }

    #[test]
    fn player_death_reports_defeat() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let player = scene.player_id.expect("player");
        world.remove_entity(player);

        assert!(matches!(
            step(&mut scene, &mut world, &InputSnapshot::empty()),
            SceneCommand::Push(_)
        ));
        assert_eq!(scene.state.outcome, Some(Outcome::Defeat));
    }

    #[test]
    fn escape_and_focus_loss_pause_the_level() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let escape = InputSnapshot::empty().with_key_pressed(Key::Escape);
        match step(&mut scene, &mut world, &escape) {
            SceneCommand::Push(pause) => assert_eq!(pause.name(), "pause"),
            other => panic!("expected pause push, got {other:?}"),
        }
        match scene.blur(&mut world) {
            SceneCommand::Push(pause) => assert_eq!(pause.name(), "pause"),
            other => panic!("expected pause push, got {other:?}"),
        }
    }

    #[test]
    fn player_walks_at_the_configured_speed_and_faces_its_direction() {
        let (mut scene, mut world) = loaded_level(Settings {
            player_speed: 3.0,
            ..seeded_settings()
        });
        let player = scene.player_id.expect("player");
        let start = world.find_entity(player).expect("player").position;

        let left = InputSnapshot::empty().with_key_down(Key::A);
        step(&mut scene, &mut world, &left);
        let moved = world.find_entity(player).expect("player").position;
        assert_eq!(moved, start - Vec2::new(3.0, 0.0));
        match scene.actors.get(&player) {
            Some(Actor::Player(actor)) => {
                assert!(actor.body.facing_left);
                assert_eq!(actor.state, PlayerState::Walk);
            }
            other => panic!("unexpected actor {other:?}"),
        }
    }

    #[test]
    fn punching_spawns_a_hitbox_and_returns_to_idle() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let player = scene.player_id.expect("player");
        let punch = InputSnapshot::empty().with_key_pressed(Key::Space);
        step(&mut scene, &mut world, &punch);

        let hitboxes = scene
            .actors
            .values()
            .filter(|actor| actor.kind() == ActorKind::Hitbox)
            .count();
        assert_eq!(hitboxes, 1);

        for _ in 0..60 {
            step(&mut scene, &mut world, &InputSnapshot::empty());
        }
        match scene.actors.get(&player) {
            Some(Actor::Player(actor)) => assert_eq!(actor.state, PlayerState::Idle),
            other => panic!("unexpected actor {other:?}"),
        }
        assert!(scene
            .actors
            .values()
            .all(|actor| actor.kind() != ActorKind::Hitbox));
    }

    #[test]
    fn throwing_a_bubble_restarts_the_regen_timer() {
        let (mut scene, mut world) = loaded_level(seeded_settings());
        let player = scene.player_id.expect("player");
        if let Some(Actor::Player(actor)) = scene.actors.get_mut(&player) {
            actor.bubbles = MAX_BUBBLES - 1;
            actor.bubble_ticks = BUBBLE_REGEN_TICKS - 5;
        }
        let bubbles = |scene: &LevelScene| match scene.actors.get(&player) {
            Some(Actor::Player(actor)) => (actor.bubbles, actor.bubble_ticks),
            other => panic!("unexpected actor {other:?}"),
        };

        let throw = InputSnapshot::empty().with_key_pressed(Key::Z);
        step(&mut scene, &mut world, &throw);
        assert_eq!(bubbles(&scene), (MAX_BUBBLES - 2, 0));

        for _ in 0..BUBBLE_REGEN_TICKS - 1 {
            step(&mut scene, &mut world, &InputSnapshot::empty());
        }
        assert_eq!(bubbles(&scene).0, MAX_BUBBLES - 2);
        step(&mut scene, &mut world, &InputSnapshot::empty());
        assert_eq!(bubbles(&scene), (MAX_BUBBLES - 1, 0));
    }

    #[test]
    fn debug_overlay_strokes_colliders_when_enabled() {
        let (scene, world) = loaded_level(Settings {
            show_hitboxes: true,
            ..seeded_settings()
        });
        let mut surface = canvas_lord::RecordingSurface::new(480, 270);
        scene.render(&world, &mut surface);
        let strokes = surface
            .calls()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    canvas_lord::DrawCall::Rect {
                        style: ShapeStyle::Stroke(_),
                        ..
                    }
                )
            })
            .count();
        assert_eq!(strokes, 1 + GRIMEY_COUNT);
    }
