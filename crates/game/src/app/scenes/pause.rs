use canvas_lord::{
    Color, EntityDesc, Graphic, InputSnapshot, Key, Scene, SceneCommand, SceneError, SceneWorld,
    ShapeStyle, Vec2,
};
use tracing::info;

use super::centered_text;

const PAUSE_SCENE_NAME: &str = "pause";
const RESUME_KEYS: [Key; 3] = [Key::Escape, Key::P, Key::Enter];

/// Dims the frozen level underneath until a resume key is pressed.
#[derive(Debug, Default)]
pub(crate) struct PauseScene;

impl PauseScene {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Scene for PauseScene {
    fn name(&self) -> &'static str {
        PAUSE_SCENE_NAME
    }

    fn load(&mut self, world: &mut SceneWorld) -> Result<(), SceneError> {
        let (width, height) = world.viewport();
        let (width, height) = (width as f64, height as f64);
        world.spawn(
            EntityDesc::at(Vec2::ZERO).with_graphic(
                Graphic::rect(width, height, ShapeStyle::Fill(Color::rgba(0, 0, 0, 0x99)))
                    .with_scroll(Vec2::ZERO),
            ),
        );
        world.spawn(centered_text(
            "PAUSED",
            16.0,
            Color::WHITE,
            Vec2::new(width * 0.5, height * 0.5),
        ));
        world.spawn(centered_text(
            "ESC OR P TO RESUME",
            8.0,
            Color::rgb(0xcc, 0xcc, 0xcc),
            Vec2::new(width * 0.5, height * 0.5 + 24.0),
        ));
        Ok(())
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        _world: &mut SceneWorld,
    ) -> Result<SceneCommand, SceneError> {
        if input.key_pressed(&RESUME_KEYS) {
            info!(scene = PAUSE_SCENE_NAME, "pause_dismissed");
            return Ok(SceneCommand::Pop(1));
        }
        Ok(SceneCommand::None)
    }
}
