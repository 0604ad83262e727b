mod assets;
mod collider;
mod entity;
mod graphic;
mod input;
mod loop_runner;
mod rendering;
mod scene;
mod script;
mod sprite;
mod stack;

pub use assets::{
    AssetError, AssetKeyError, AssetManager, Assets, AudioSink, AudioStore, LoadedImage,
    LogAudioSink, SoundHandle, SpriteStore,
};
pub use collider::{Collider, ColliderTag};
pub use entity::{Entity, EntityDesc, EntityId, EntityIdAllocator};
pub use graphic::{sheet_frame_rect, Graphic, GraphicKind};
pub use input::{InputSnapshot, Key, KeySet};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    measure_text, world_to_screen, Color, DrawCall, DrawSurface, FrameSurface, ImageDraw,
    RecordingSurface, Renderer, ShapeStyle,
};
pub use scene::{Scene, SceneCommand, SceneError, SceneWorld};
pub use script::{Script, ScriptStep};
pub use sprite::{AnimatedSprite, Animation, AnimationEvent, SpriteError};
pub use stack::{SceneStack, StackStatus};
