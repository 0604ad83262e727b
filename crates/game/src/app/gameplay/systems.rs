fn apply_friction(body: &mut Character) {
    body.velocity -= body.velocity * body.friction;
}

/// Applies a hit. Returns `Ignored` while invincibility frames are running.
fn hurt(body: &mut Character, points: u32) -> HurtOutcome {
    if body.dead || body.inv_frames > 0 {
        return HurtOutcome::Ignored;
    }

    let outcome = if body.invulnerable {
        body.health = body.max_health;
        HurtOutcome::Damaged
    } else if body.health <= points {
        body.health = 0;
        body.dead = true;
        HurtOutcome::Killed
    } else {
        body.health -= points;
        HurtOutcome::Damaged
    };
    body.inv_frames = INVINCIBILITY_TICKS;
    update_hit_flash(body);
    outcome
}

fn tick_invincibility(body: &mut Character) {
    body.inv_frames = body.inv_frames.saturating_sub(1);
    update_hit_flash(body);
}

fn update_hit_flash(body: &mut Character) {
    body.hit_flash =
        !body.dead && body.inv_frames > 0 && body.inv_frames % HIT_FLASH_PERIOD >= HIT_FLASH_ON_FROM;
}

/// Moves `id` by `delta`, one axis at a time, refusing any axis step that
/// would overlap another character. Bodies that ignore collisions move
/// freely. The result is clamped to the floor band and `bounds_x`.
fn move_character(
    world: &mut SceneWorld,
    id: EntityId,
    body: &Character,
    delta: Vec2,
    bounds_x: (f64, f64),
) {
    let Some(start) = world.find_entity(id).map(|entity| entity.position) else {
        return;
    };

    let mut position = start;
    if body.ignore_collisions || body.dead {
        position += delta;
    } else {
        let step_x = Vec2::new(position.x + delta.x, position.y);
        if delta.x != 0.0 && world.collide_first(id, step_x, &[CHAR]).is_none() {
            position = step_x;
        }
        let step_y = Vec2::new(position.x, position.y + delta.y);
        if delta.y != 0.0 && world.collide_first(id, step_y, &[CHAR]).is_none() {
            position = step_y;
        }
    }

    position.x = position.x.clamp(bounds_x.0, bounds_x.1.max(bounds_x.0));
    position.y = position.y.clamp(FLOOR_TOP, FLOOR_BOTTOM);

    if let Some(entity) = world.find_entity_mut(id) {
        entity.position = position;
    }
}

/// Friction, then velocity integration.
fn integrate_character(
    world: &mut SceneWorld,
    id: EntityId,
    body: &mut Character,
    bounds_x: (f64, f64),
) {
    apply_friction(body);
    if body.velocity != Vec2::ZERO {
        move_character(world, id, body, body.velocity, bounds_x);
    }
}

/// Copies depth, facing and hit flash onto the entity.
fn settle_character(entity: &mut Entity, body: &Character) {
    entity.depth = -entity.position.y;
    if let Some(layer) = entity.graphic.as_mut().and_then(Graphic::animated_layer_mut) {
        layer.flip_x = body.facing_left;
        layer.offset.x = if body.facing_left {
            body.flip_offset
        } else {
            -body.flip_offset
        };
        layer.tint = body.hit_flash.then_some(Color::WHITE);
    }
}

fn play_animation(world: &mut SceneWorld, id: EntityId, name: &str) -> Result<(), SpriteError> {
    match world.find_entity_mut(id).and_then(Entity::sprite_mut) {
        Some(sprite) => sprite.play(name),
        None => Ok(()),
    }
}

fn restart_animation(world: &mut SceneWorld, id: EntityId, name: &str) -> Result<(), SpriteError> {
    match world.find_entity_mut(id).and_then(Entity::sprite_mut) {
        Some(sprite) => sprite.restart(name),
        None => Ok(()),
    }
}

fn tick_animation(world: &mut SceneWorld, id: EntityId) -> Option<AnimationEvent> {
    world.find_entity_mut(id)?.tick_graphic()
}

fn set_collidable(world: &mut SceneWorld, id: EntityId, collidable: bool) {
    if let Some(collider) = world
        .find_entity_mut(id)
        .and_then(|entity| entity.collider.as_mut())
    {
        collider.collidable = collidable;
    }
}

fn position_of(world: &SceneWorld, id: EntityId) -> Option<Vec2> {
    world
        .find_entity(id)
        .filter(|entity| entity.is_attached())
        .map(|entity| entity.position)
}

/// -1, 0 or 1; unlike `f64::signum`, zero maps to zero.
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
