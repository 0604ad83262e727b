#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpriteSheet {
    asset: &'static str,
    frame_width: u32,
    frame_height: u32,
}

const PLAYER_SHEET: SpriteSheet = SpriteSheet {
    asset: MR_CLEAN_PNG,
    frame_width: 80,
    frame_height: 80,
};
const GRIMEY_SHEET: SpriteSheet = SpriteSheet {
    asset: BADGUY_PNG,
    frame_width: 80,
    frame_height: 80,
};
const BOSS_SHEET: SpriteSheet = SpriteSheet {
    asset: GRIMEBOSS_PNG,
    frame_width: 128,
    frame_height: 128,
};

const PLAYER_COLLIDER: Vec2 = Vec2::new(20.0, 20.0);
const GRIMEY_COLLIDER: Vec2 = Vec2::new(20.0, 20.0);
const BOSS_COLLIDER: Vec2 = Vec2::new(30.0, 24.0);
const TRAPPED_SCALE: f64 = 0.4;

/// Sheet frames 4-5-5-5-6; the three middle cursors land the blow.
fn punch_animation(frame_ticks: u32) -> Animation {
    Animation::once([4, 5, 5, 5, 6], frame_ticks).with_damage_frames(1..=3)
}

fn player_sprite() -> Result<AnimatedSprite, SpriteError> {
    AnimatedSprite::new()
        .with_animation("idle", Animation::looping([0], 60))?
        .with_animation("walk", Animation::looping([0, 1, 2, 3], 20))?
        .with_animation("punch", punch_animation(8))?
        .with_animation("bubble_start", Animation::once([12, 13], 8))?
        .with_animation("bubble_throw", Animation::once([14], 15))?
        .with_animation("dead", Animation::looping([7], 60))
}

fn enemy_sprite(kind: ActorKind) -> Result<AnimatedSprite, SpriteError> {
    let (walk_ticks, punch_ticks) = match kind {
        ActorKind::Boss => (20, 10),
        _ => (16, 8),
    };
    AnimatedSprite::new()
        .with_animation("idle", Animation::looping([0], 60))?
        .with_animation("walk", Animation::looping([0, 1, 2, 3], walk_ticks))?
        .with_animation("punch", punch_animation(punch_ticks))?
        .with_animation("stuck", Animation::looping([7], 60))?
        .with_animation("stunned", Animation::looping([7], 60))?
        .with_animation("dead", Animation::looping([8], 60))
}

/// Shadow ellipse under an animated body anchored at the feet.
fn character_desc(
    assets: &Assets,
    sheet: SpriteSheet,
    position: Vec2,
    mut sprite: AnimatedSprite,
    collider_size: Vec2,
) -> Result<EntityDesc, GameplayError> {
    let image = assets.sprites().get(sheet.asset)?;
    let columns = (image.width / sheet.frame_width).max(1);
    sprite.play("idle")?;

    let shadow = Graphic::circle(9.0, 2.0, ShapeStyle::Fill(Color::rgba(0, 0, 0, 0x33)));
    let body = Graphic::animated(
        sheet.asset,
        sheet.frame_width,
        sheet.frame_height,
        columns,
        sprite,
    )
    .with_origin(Vec2::new(
        sheet.frame_width as f64 * 0.5,
        sheet.frame_height as f64,
    ));
    let collider = Collider::new(
        collider_size.x,
        collider_size.y,
        Vec2::new(-collider_size.x * 0.5, -collider_size.y * 0.5 - 10.0),
        CHAR,
    );

    Ok(EntityDesc::at(position)
        .with_depth(-position.y)
        .with_collider(collider)
        .with_graphic(Graphic::list(vec![shadow, body])))
}

/// Hit windows start closed; the owner's damage frames open them.
fn hitbox_desc(position: Vec2) -> EntityDesc {
    let mut collider = Collider::new(20.0, 60.0, Vec2::new(0.0, -30.0), HITBOX);
    collider.collidable = false;
    EntityDesc::at(position).with_collider(collider)
}

fn bubble_desc(assets: &Assets, position: Vec2) -> Result<EntityDesc, AssetError> {
    let image = assets.sprites().get(BUBBLES2_PNG)?;
    let graphic = Graphic::image(BUBBLES2_PNG)
        .with_origin(Vec2::new(image.width as f64 * 0.5, image.height as f64 * 0.5))
        .with_scale(2.0)
        .with_offset(Vec2::new(0.0, -50.0));
    Ok(EntityDesc::at(position)
        .with_depth(-position.y)
        .with_collider(Collider::new(40.0, 40.0, Vec2::new(-20.0, -20.0), BUBBLE))
        .with_graphic(graphic))
}

fn axis(input: &InputSnapshot, positive: &[Key], negative: &[Key]) -> f64 {
    f64::from(i8::from(input.key_check(positive)) - i8::from(input.key_check(negative)))
}

impl LevelScene {
    fn update_actor(
        &mut self,
        actor: &mut Actor,
        id: EntityId,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        let kind = actor.kind();
        match actor {
            Actor::Player(player) => self.update_player(player, id, input, world),
            Actor::Grimey(enemy) | Actor::Boss(enemy) => self.update_enemy(kind, enemy, id, world),
            Actor::Hitbox(hitbox) => self.update_hitbox(hitbox, id, world),
            Actor::Bubble(bubble) => self.update_bubble(bubble, id, world),
        }
    }

    fn update_player(
        &mut self,
        player: &mut PlayerActor,
        id: EntityId,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        let bounds = self.walk_bounds(world);
        let previous = player.state;

        if player.bubbles < MAX_BUBBLES {
            player.bubble_ticks += 1;
            if player.bubble_ticks >= BUBBLE_REGEN_TICKS {
                player.bubbles += 1;
                player.bubble_ticks = 0;
            }
        }

        if player.body.dead {
            player.state = PlayerState::Dead;
        } else if player.state.accepts_input() {
            let dir = Vec2::new(
                axis(input, &[Key::D, Key::ArrowRight], &[Key::A, Key::ArrowLeft]),
                axis(input, &[Key::S, Key::ArrowDown], &[Key::W, Key::ArrowUp]),
            );
            player.state = if dir == Vec2::ZERO {
                PlayerState::Idle
            } else {
                PlayerState::Walk
            };
            if dir.x != 0.0 {
                player.body.facing_left = dir.x < 0.0;
            }
            if dir != Vec2::ZERO {
                let step = dir * self.context.settings.player_speed;
                move_character(world, id, &player.body, step, bounds);
            }

            if input.key_pressed(&Key::Z) && player.bubbles > 0 {
                player.bubbles -= 1;
                player.bubble_ticks = 0;
                player.state = PlayerState::BubbleStart;
            } else if input.key_pressed(&Key::Space) {
                player.hitbox =
                    self.spawn_hitbox(world, id, Team::Hero, PUNCH_DAMAGE, &player.body);
                player.state = PlayerState::Punch;
            }
        }

        if player.state != previous {
            enter_animation(world, id, player.state.animation())?;
        }

        integrate_character(world, id, &mut player.body, bounds);

        if let Some(AnimationEvent::Completed { .. }) = tick_animation(world, id) {
            match player.state {
                PlayerState::Punch | PlayerState::BubbleThrow => {
                    player.state = PlayerState::Idle;
                    enter_animation(world, id, player.state.animation())?;
                }
                PlayerState::BubbleStart => {
                    self.spawn_bubble(world, id, &player.body)?;
                    player.state = PlayerState::BubbleThrow;
                    enter_animation(world, id, player.state.animation())?;
                }
                _ => {}
            }
        }

        tick_invincibility(&mut player.body);
        if player.body.dead {
            player.body.death_ticks = player.body.death_ticks.saturating_sub(1);
        }
        if let Some(entity) = world.find_entity_mut(id) {
            settle_character(entity, &player.body);
        }
        Ok(())
    }

    fn update_enemy(
        &mut self,
        kind: ActorKind,
        enemy: &mut EnemyActor,
        id: EntityId,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        let bounds = self.walk_bounds(world);
        enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);

        match enemy.state {
            EnemyState::Advance => self.advance_enemy(kind, enemy, id, world, bounds)?,
            EnemyState::Stunned => {
                enemy.stun_ticks = enemy.stun_ticks.saturating_sub(1);
                if enemy.stun_ticks == 0 {
                    enemy.state = EnemyState::Advance;
                    play_animation(world, id, "idle")?;
                }
            }
            EnemyState::Trapped => {
                if !enemy.captor.is_some_and(|bubble| world.is_attached(bubble)) {
                    enemy.captor = None;
                    enemy.state = EnemyState::Advance;
                    set_sprite_scale(world, id, 1.0);
                    play_animation(world, id, "idle")?;
                }
            }
            EnemyState::Attack | EnemyState::Dead => {}
        }

        // A bubble carries its captive.
        if enemy.state != EnemyState::Trapped {
            integrate_character(world, id, &mut enemy.body, bounds);
        }

        if let Some(AnimationEvent::Completed { .. }) = tick_animation(world, id) {
            if enemy.state == EnemyState::Attack {
                enemy.state = EnemyState::Advance;
                enemy.hitbox = None;
                play_animation(world, id, "idle")?;
            }
        }

        tick_invincibility(&mut enemy.body);
        if enemy.body.dead {
            enemy.body.death_ticks = enemy.body.death_ticks.saturating_sub(1);
            if enemy.body.death_ticks == 0 {
                world.remove_entity(id);
                debug!(entity = id.0, kind = kind.as_token(), "enemy_removed");
                return Ok(());
            }
        }
        if let Some(entity) = world.find_entity_mut(id) {
            settle_character(entity, &enemy.body);
        }
        Ok(())
    }

    /// Walks to the director's slot and punches from there; enemies without
    /// a slot keep their distance.
    fn advance_enemy(
        &mut self,
        kind: ActorKind,
        enemy: &mut EnemyActor,
        id: EntityId,
        world: &mut SceneWorld,
        bounds: (f64, f64),
    ) -> Result<(), GameplayError> {
        let (Some(position), Some(player)) = (position_of(world, id), self.player_position(world))
        else {
            play_animation(world, id, "idle")?;
            return Ok(());
        };
        let to_player = player - position;

        let Some(slot) = self.director.target_of(id) else {
            let gap = position.x - player.x;
            if gap.abs() < ENEMY_WAIT_DISTANCE {
                let away = if gap == 0.0 { 1.0 } else { sign(gap) };
                let step = Vec2::new(away * enemy.speed, 0.0);
                move_character(world, id, &enemy.body, step, bounds);
                play_animation(world, id, "walk")?;
            } else {
                play_animation(world, id, "idle")?;
            }
            if to_player.x != 0.0 {
                enemy.body.facing_left = to_player.x < 0.0;
            }
            return Ok(());
        };

        let to_slot = slot - position;
        let distance = to_slot.magnitude();
        if distance > ENEMY_ARRIVE_DISTANCE {
            let step = to_slot.normalize() * enemy.speed.min(distance);
            if step.x != 0.0 {
                enemy.body.facing_left = step.x < 0.0;
            }
            move_character(world, id, &enemy.body, step, bounds);
            play_animation(world, id, "walk")?;
            return Ok(());
        }

        if to_player.x != 0.0 {
            enemy.body.facing_left = to_player.x < 0.0;
        }
        if enemy.attack_cooldown > 0 {
            play_animation(world, id, "idle")?;
            return Ok(());
        }

        let damage = match kind {
            ActorKind::Boss => PUNCH_DAMAGE,
            _ => GRIMEY_PUNCH_DAMAGE,
        };
        enemy.hitbox = self.spawn_hitbox(world, id, Team::Grime, damage, &enemy.body);
        enemy.attack_cooldown = ENEMY_ATTACK_COOLDOWN_TICKS;
        enemy.state = EnemyState::Attack;
        restart_animation(world, id, "punch")?;
        Ok(())
    }

    fn update_hitbox(
        &mut self,
        hitbox: &mut HitboxActor,
        id: EntityId,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        // The owner must still be alive, still claim this hitbox and still be
        // mid-punch; a stun or trap cancels the swing.
        let claimed = match self.actors.get(&hitbox.owner) {
            Some(Actor::Player(player)) => !player.body.dead && player.hitbox == Some(id),
            Some(Actor::Grimey(enemy)) | Some(Actor::Boss(enemy)) => {
                !enemy.body.dead && enemy.hitbox == Some(id)
            }
            _ => false,
        };
        let damage_window = world
            .find_entity(hitbox.owner)
            .filter(|owner| owner.is_attached())
            .and_then(Entity::sprite)
            .filter(|sprite| sprite.is_playing("punch"))
            .map(AnimatedSprite::in_damage_frame);
        let Some(active) = damage_window.filter(|_| claimed) else {
            world.remove_entity(id);
            self.clear_owner_hitbox(hitbox.owner, id);
            return Ok(());
        };

        set_collidable(world, id, active);
        if !active {
            if hitbox.has_collided {
                world.remove_entity(id);
                self.clear_owner_hitbox(hitbox.owner, id);
            }
            return Ok(());
        }

        hitbox.has_collided = true;
        let Some(position) = position_of(world, id) else {
            return Ok(());
        };
        for target in world.collide_all(id, position, &[CHAR]) {
            if target == hitbox.owner {
                continue;
            }
            let outcome = match self.actors.get_mut(&target).and_then(Actor::body_mut) {
                Some(body) if body.team != hitbox.team => hurt(body, hitbox.damage),
                _ => continue,
            };
            self.resolve_hit(world, target, outcome, hitbox.dir)?;
        }
        Ok(())
    }

    fn update_bubble(
        &mut self,
        bubble: &mut BubbleActor,
        id: EntityId,
        world: &mut SceneWorld,
    ) -> Result<(), GameplayError> {
        bubble.phase += BUBBLE_PHASE_STEP;
        let camera = world.camera();
        let view_width = world.viewport().0 as f64;
        let Some(entity) = world.find_entity_mut(id) else {
            return Ok(());
        };
        entity.position.x += bubble.dir * BUBBLE_SPEED;
        if let Some(graphic) = entity.graphic.as_mut() {
            graphic.offset.y = (bubble.phase * 0.5).sin() * 8.0 - 50.0;
        }
        let position = entity.position;

        let view_x = position.x - camera.x;
        if view_x < 0.0 || view_x >= view_width {
            return self.pop_bubble(world, id, bubble);
        }

        if let Some(captive) = bubble.captive {
            let holding = world.is_attached(captive)
                && self.actors.get(&captive).is_some_and(|actor| !actor.is_dead());
            if !holding {
                return self.pop_bubble(world, id, bubble);
            }
            if let Some(entity) = world.find_entity_mut(captive) {
                entity.position = position;
            }
            return Ok(());
        }

        let caught = world
            .collide_all(id, position, &[CHAR])
            .into_iter()
            .filter(|target| *target != bubble.owner)
            .find(|target| match self.actors.get(target) {
                Some(Actor::Grimey(enemy)) | Some(Actor::Boss(enemy)) => {
                    !enemy.body.dead && enemy.state != EnemyState::Trapped
                }
                _ => false,
            });
        let Some(target) = caught else {
            return Ok(());
        };
        let Some(actor) = self.actors.get_mut(&target) else {
            return Ok(());
        };
        let kind = actor.kind();
        let Some(enemy) = actor.enemy_mut() else {
            return Ok(());
        };

        drop_hitbox(world, &mut enemy.hitbox);
        if kind == ActorKind::Boss {
            enemy.state = EnemyState::Stunned;
            enemy.stun_ticks = BOSS_STUN_TICKS;
            enemy.body.velocity.x = BOSS_STUN_KNOCKBACK * bubble.dir;
            let outcome = hurt(&mut enemy.body, BUBBLE_DAMAGE);
            restart_animation(world, target, "stunned")?;
            info!(entity = target.0, "boss_stunned");
            self.resolve_hit(world, target, outcome, bubble.dir)?;
            return self.pop_bubble(world, id, bubble);
        }

        enemy.state = EnemyState::Trapped;
        enemy.captor = Some(id);
        let outcome = hurt(&mut enemy.body, BUBBLE_DAMAGE);
        restart_animation(world, target, "stuck")?;
        set_sprite_scale(world, target, TRAPPED_SCALE);
        bubble.captive = Some(target);
        info!(entity = target.0, bubble = id.0, "enemy_trapped");
        if outcome == HurtOutcome::Killed {
            self.resolve_hit(world, target, outcome, bubble.dir)?;
            return self.pop_bubble(world, id, bubble);
        }
        Ok(())
    }

    /// Releases any captive, pops and removes the bubble.
    fn pop_bubble(
        &mut self,
        world: &mut SceneWorld,
        id: EntityId,
        bubble: &mut BubbleActor,
    ) -> Result<(), GameplayError> {
        if let Some(captive) = bubble.captive.take() {
            set_sprite_scale(world, captive, 1.0);
            if let Some(enemy) = self.actors.get_mut(&captive).and_then(Actor::enemy_mut) {
                enemy.captor = None;
                if enemy.state == EnemyState::Trapped {
                    enemy.state = EnemyState::Advance;
                    play_animation(world, captive, "idle")?;
                }
            }
        }
        self.play_sound(POP_WAV)?;
        world.remove_entity(id);
        Ok(())
    }

    fn resolve_hit(
        &mut self,
        world: &mut SceneWorld,
        target: EntityId,
        outcome: HurtOutcome,
        dir: f64,
    ) -> Result<(), GameplayError> {
        if outcome == HurtOutcome::Ignored {
            return Ok(());
        }
        let key = PUNCH_SFX[self.rng.random_range(0..PUNCH_SFX.len())];
        self.play_sound(key)?;
        if Some(target) == self.player_id {
            let key = HURT_SFX[self.rng.random_range(0..HURT_SFX.len())];
            self.play_sound(key)?;
        }
        if outcome == HurtOutcome::Killed {
            self.kill(world, target, dir)?;
        }
        Ok(())
    }

    /// Knocks a freshly killed character back, frees its slot and stops it
    /// from blocking or being hit. Removal waits for the death timer.
    fn kill(&mut self, world: &mut SceneWorld, id: EntityId, dir: f64) -> Result<(), GameplayError> {
        let Some(actor) = self.actors.get_mut(&id) else {
            return Ok(());
        };
        let kind = actor.kind();
        match actor {
            Actor::Player(player) => {
                player.state = PlayerState::Dead;
                drop_hitbox(world, &mut player.hitbox);
            }
            Actor::Grimey(enemy) | Actor::Boss(enemy) => {
                enemy.state = EnemyState::Dead;
                drop_hitbox(world, &mut enemy.hitbox);
            }
            Actor::Hitbox(_) | Actor::Bubble(_) => {}
        }
        if let Some(body) = actor.body_mut() {
            body.dead = true;
            body.health = 0;
            body.velocity.x = DEATH_KNOCKBACK * dir;
            body.friction = DEATH_FRICTION;
            body.death_ticks = DEATH_LINGER_TICKS;
            update_hit_flash(body);
        }

        self.director.unregister(id);
        set_collidable(world, id, false);
        restart_animation(world, id, "dead")?;
        info!(entity = id.0, kind = kind.as_token(), "character_killed");
        Ok(())
    }

    fn spawn_hitbox(
        &mut self,
        world: &mut SceneWorld,
        owner: EntityId,
        team: Team,
        damage: u32,
        body: &Character,
    ) -> Option<EntityId> {
        let position = position_of(world, owner)?;
        let reach = if body.facing_left {
            -PUNCH_REACH_BEHIND
        } else {
            PUNCH_REACH_AHEAD
        };
        let id = world.add_entity(hitbox_desc(position + Vec2::new(reach, 0.0)));
        self.actors.insert(
            id,
            Actor::Hitbox(HitboxActor {
                owner,
                team,
                damage,
                dir: body.facing_sign(),
                has_collided: false,
            }),
        );
        Some(id)
    }

    fn spawn_bubble(
        &mut self,
        world: &mut SceneWorld,
        owner: EntityId,
        body: &Character,
    ) -> Result<(), GameplayError> {
        let Some(position) = position_of(world, owner) else {
            return Ok(());
        };
        let dir = body.facing_sign();
        let desc = bubble_desc(
            &self.context.assets,
            position + Vec2::new(BUBBLE_SPAWN_AHEAD * dir, 0.0),
        )?;
        let id = world.spawn(desc);
        self.actors.insert(
            id,
            Actor::Bubble(BubbleActor {
                owner,
                dir,
                phase: 0.0,
                captive: None,
            }),
        );
        info!(entity = id.0, dir, "bubble_thrown");
        Ok(())
    }

    fn clear_owner_hitbox(&mut self, owner: EntityId, hitbox: EntityId) {
        let slot = match self.actors.get_mut(&owner) {
            Some(Actor::Player(player)) => &mut player.hitbox,
            Some(Actor::Grimey(enemy)) | Some(Actor::Boss(enemy)) => &mut enemy.hitbox,
            _ => return,
        };
        if *slot == Some(hitbox) {
            *slot = None;
        }
    }

    fn play_sound(&mut self, key: &str) -> Result<(), GameplayError> {
        let sound = self.context.assets.audio().get(key)?;
        self.audio.play(sound, 1.0);
        Ok(())
    }
}

/// Punch restarts even when already current so back-to-back punches rerun
/// the damage window.
fn enter_animation(world: &mut SceneWorld, id: EntityId, name: &str) -> Result<(), SpriteError> {
    if name == "punch" {
        restart_animation(world, id, name)
    } else {
        play_animation(world, id, name)
    }
}

fn drop_hitbox(world: &mut SceneWorld, hitbox: &mut Option<EntityId>) {
    if let Some(id) = hitbox.take() {
        world.remove_entity(id);
    }
}

fn set_sprite_scale(world: &mut SceneWorld, id: EntityId, scale: f64) {
    if let Some(layer) = world
        .find_entity_mut(id)
        .and_then(|entity| entity.graphic.as_mut())
        .and_then(Graphic::animated_layer_mut)
    {
        layer.scale = scale;
    }
}
