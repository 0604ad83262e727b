use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use canvas_lord::{
    measure_text, AnimatedSprite, Animation, AnimationEvent, AssetError, Assets, AudioSink, Collider,
    ColliderTag, Color, DrawSurface, Entity, EntityDesc, EntityId, Graphic, GraphicKind,
    InputSnapshot, Key, LogAudioSink, Scene, SceneCommand, SceneError, SceneWorld,
    ShapeStyle, SpriteError, Vec2,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use super::assets::{
    BADGUY_PNG, BG2_PNG, BG_PNG, BUBBLES2_PNG, FLOOR_PNG, GRIMEBOSS_PNG, HURT_SFX, MR_CLEAN_PNG,
    POP_WAV, PUNCH_SFX,
};
use super::bootstrap::GameContext;
use super::scenes::{PauseScene, ResultsScene};
use super::settings::Settings;

const LEVEL_SCENE_NAME: &str = "level";

const CHAR: ColliderTag = ColliderTag("CHAR");
const HITBOX: ColliderTag = ColliderTag("HITBOX");
const BUBBLE: ColliderTag = ColliderTag("BUBBLE");

const DEPTH_FAR_BACKGROUND: f64 = 3.0;
const DEPTH_BACKGROUND: f64 = 2.0;
const DEPTH_FLOOR: f64 = 1.0;
const DEPTH_HUD: f64 = -100_000.0;
const DEPTH_OVERLAY: f64 = -200_000.0;

const FLOOR_TOP: f64 = 150.0;
const FLOOR_BOTTOM: f64 = 262.0;
const LEVEL_MIN_X: f64 = 12.0;
const LEVEL_LENGTH: f64 = 2_000.0;
const BOSS_ROOM_MARGIN: f64 = 12.0;

const INVINCIBILITY_TICKS: u32 = 30;
const HIT_FLASH_PERIOD: u32 = 16;
const HIT_FLASH_ON_FROM: u32 = 8;
const DEFAULT_FRICTION: f64 = 0.5;
const DEATH_FRICTION: f64 = 0.2;
const DEATH_KNOCKBACK: f64 = 30.0;
const DEATH_LINGER_TICKS: u32 = 40;

const PLAYER_MAX_HEALTH: u32 = 10;
const PLAYER_FLIP_OFFSET: f64 = 10.0;
const PLAYER_THREAT_POINTS: i32 = -1;
const MAX_BUBBLES: u32 = 3;
const BUBBLE_REGEN_TICKS: u32 = 120;

const PUNCH_DAMAGE: u32 = 2;
const GRIMEY_PUNCH_DAMAGE: u32 = 1;
const PUNCH_REACH_AHEAD: f64 = 20.0;
const PUNCH_REACH_BEHIND: f64 = 40.0;

const BUBBLE_SPAWN_AHEAD: f64 = 35.0;
const BUBBLE_SPEED: f64 = 1.5;
const BUBBLE_PHASE_STEP: f64 = 10.0 / 60.0;
const BUBBLE_DAMAGE: u32 = 1;
const BOSS_STUN_KNOCKBACK: f64 = 20.0;
const BOSS_STUN_TICKS: u32 = 60;

const GRIMEY_COUNT: usize = 5;
const GRIMEY_THREAT_POINTS: i32 = 1;
const GRIMEY_SPEED: f64 = 0.8;
const BOSS_THREAT_POINTS: i32 = 3;
const BOSS_SPEED: f64 = 0.6;
const BOSS_HEALTH_MULTIPLIER: u32 = 3;
const ENEMY_ARRIVE_DISTANCE: f64 = 4.0;
const ENEMY_WAIT_DISTANCE: f64 = 140.0;
const ENEMY_ATTACK_COOLDOWN_TICKS: u32 = 90;

const SLOT_COUNT: usize = 8;
const SLOT_RADIUS_X: f64 = 36.0;
const SLOT_RADIUS_Y: f64 = 20.0;

const OVERLAY_FADE_STEP: f64 = 1.0 / 60.0;
const BOSS_INTRO_TEXT: &str = "GRIME BOSS";

include!("types.rs");
include!("director.rs");
include!("systems.rs");
include!("actors.rs");
include!("stage.rs");
include!("scene_state.rs");
include!("scene_impl.rs");

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
