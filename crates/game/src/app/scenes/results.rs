use canvas_lord::{
    Color, EntityDesc, EntityId, Graphic, InputSnapshot, Scene, SceneCommand, SceneError,
    SceneWorld, ShapeStyle, Vec2,
};
use tracing::info;

use super::{centered_text, CONTINUE_KEYS};

const RESULTS_SCENE_NAME: &str = "results";
const FADE_STEP: f64 = 0.01;
const BANNER_SIZE: f64 = 24.0;
const PROMPT_TEXT: &str = "PRESS SPACE";

/// End-of-level card. Fades to black over the level, then pops itself and
/// the level on a continue key.
#[derive(Debug)]
pub(crate) struct ResultsScene {
    banner: &'static str,
    fade: f64,
    backdrop: Option<EntityId>,
    prompt: Option<EntityId>,
}

impl ResultsScene {
    pub(crate) fn new(banner: &'static str) -> Self {
        Self {
            banner,
            fade: 0.0,
            backdrop: None,
            prompt: None,
        }
    }

    fn faded_in(&self) -> bool {
        self.fade >= 1.0
    }
}

impl Scene for ResultsScene {
    fn name(&self) -> &'static str {
        RESULTS_SCENE_NAME
    }

    fn load(&mut self, world: &mut SceneWorld) -> Result<(), SceneError> {
        let (width, height) = world.viewport();
        let (width, height) = (width as f64, height as f64);
        let center = Vec2::new(width * 0.5, height * 0.5);

        self.backdrop = Some(
            world.spawn(
                EntityDesc::at(Vec2::ZERO).with_graphic(
                    Graphic::rect(width, height, ShapeStyle::Fill(Color::BLACK))
                        .with_scroll(Vec2::ZERO)
                        .with_alpha(0.0),
                ),
            ),
        );
        world.spawn(centered_text(self.banner, BANNER_SIZE, Color::WHITE, center));
        self.prompt = Some(world.spawn(
            centered_text(
                PROMPT_TEXT,
                8.0,
                Color::rgb(0xcc, 0xcc, 0xcc),
                center + Vec2::new(0.0, BANNER_SIZE + 8.0),
            )
            .hidden(),
        ));
        info!(scene = RESULTS_SCENE_NAME, banner = self.banner, "results_shown");
        Ok(())
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<SceneCommand, SceneError> {
        if self.faded_in() && input.key_pressed(&CONTINUE_KEYS) {
            info!(scene = RESULTS_SCENE_NAME, "results_dismissed");
            return Ok(SceneCommand::Pop(2));
        }

        self.fade = (self.fade + FADE_STEP).min(1.0);
        if let Some(graphic) = self
            .backdrop
            .and_then(|id| world.find_entity_mut(id))
            .and_then(|entity| entity.graphic.as_mut())
        {
            graphic.alpha = self.fade;
        }
        if self.faded_in() {
            if let Some(prompt) = self.prompt.and_then(|id| world.find_entity_mut(id)) {
                prompt.visible = true;
            }
        }
        Ok(SceneCommand::None)
    }
}
