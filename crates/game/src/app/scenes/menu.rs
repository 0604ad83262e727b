use canvas_lord::{
    AnimatedSprite, Animation, AnimationEvent, Color, EntityDesc, EntityId, Graphic, InputSnapshot,
    Key, Scene, SceneCommand, SceneError, SceneWorld, Script, ScriptStep, SpriteError, Vec2,
};
use tracing::info;

use super::super::assets::{LOGO_PNG, MR_CLEAN_PNG};
use super::super::bootstrap::GameContext;
use super::{centered_text, LevelScene};

const MENU_SCENE_NAME: &str = "menu";
const START_LABEL: &str = "START GAME";
const LABEL_Y: f64 = 100.0;
const LABEL_SIZE: f64 = 12.0;
const HINT_SIZE: f64 = 8.0;
const ARROW_BLINK_TICKS: u64 = 30;
const START_KEYS: [Key; 2] = [Key::Space, Key::Enter];

const MASCOT_FRAME: u32 = 80;
const MASCOT_Y: f64 = 230.0;
const MASCOT_WALK_TICKS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
enum MascotCue {
    Walk(f64),
    Punch,
    Shift(Option<Color>),
    Turn,
}

fn mascot_script() -> Script<MascotCue> {
    Script::new(vec![
        ScriptStep::Hold {
            ticks: MASCOT_WALK_TICKS,
            action: MascotCue::Walk(1.0),
        },
        ScriptStep::Wait(20),
        ScriptStep::Do(MascotCue::Punch),
        ScriptStep::Wait(60),
        ScriptStep::Do(MascotCue::Shift(Some(Color::CYAN))),
        ScriptStep::Wait(30),
        ScriptStep::Do(MascotCue::Shift(None)),
        ScriptStep::Do(MascotCue::Turn),
        ScriptStep::Hold {
            ticks: MASCOT_WALK_TICKS,
            action: MascotCue::Walk(-1.0),
        },
        ScriptStep::Wait(20),
        ScriptStep::Do(MascotCue::Punch),
        ScriptStep::Wait(60),
        ScriptStep::Do(MascotCue::Turn),
    ])
    .looping()
}

fn mascot_sprite() -> Result<AnimatedSprite, SpriteError> {
    let mut sprite = AnimatedSprite::new()
        .with_animation("idle", Animation::looping([0], 60))?
        .with_animation("walk", Animation::looping([0, 1, 2, 3], 20))?
        .with_animation("punch", Animation::once([4, 5, 5, 5, 6], 8))?;
    sprite.play("idle")?;
    Ok(sprite)
}

/// Title screen: logo, blinking start prompt and a mascot running a loop.
pub(crate) struct MenuScene {
    context: GameContext,
    ticks: u64,
    arrows: Option<EntityId>,
    mascot: Option<EntityId>,
    script: Script<MascotCue>,
}

impl MenuScene {
    pub(crate) fn new(context: GameContext) -> Self {
        Self {
            context,
            ticks: 0,
            arrows: None,
            mascot: None,
            script: mascot_script(),
        }
    }

    fn drive_mascot(&mut self, world: &mut SceneWorld) -> Result<(), SceneError> {
        let Some(entity) = self.mascot.and_then(|id| world.find_entity_mut(id)) else {
            return Ok(());
        };
        let cue = self.script.resume();

        if let Some(MascotCue::Walk(dx)) = cue {
            entity.position.x += dx;
        }
        let Some(layer) = entity.graphic.as_mut() else {
            return Ok(());
        };
        match cue {
            Some(MascotCue::Shift(tint)) => layer.tint = tint,
            Some(MascotCue::Turn) => layer.flip_x = !layer.flip_x,
            _ => {}
        }
        let Some(sprite) = layer.sprite_mut() else {
            return Ok(());
        };
        match cue {
            Some(MascotCue::Walk(_)) => sprite.play("walk")?,
            Some(MascotCue::Punch) => sprite.restart("punch")?,
            _ if sprite.is_playing("walk") => sprite.play("idle")?,
            _ => {}
        }

        if let Some(AnimationEvent::Completed { .. }) = entity.tick_graphic() {
            if let Some(sprite) = entity.sprite_mut() {
                sprite.play("idle")?;
            }
        }
        Ok(())
    }
}

impl Scene for MenuScene {
    fn name(&self) -> &'static str {
        MENU_SCENE_NAME
    }

    fn load(&mut self, world: &mut SceneWorld) -> Result<(), SceneError> {
        let (width, height) = world.viewport();
        let (width, height) = (width as f64, height as f64);
        let center_x = width * 0.5;
        let assets = &self.context.assets;

        let logo = assets.sprites().get(LOGO_PNG)?;
        let (logo_width, logo_height) = (logo.width as f64, logo.height as f64);
        world.spawn(
            EntityDesc::at(Vec2::new(center_x, logo_height * 0.5)).with_graphic(
                Graphic::image(LOGO_PNG)
                    .with_origin(Vec2::new(logo_width * 0.5, logo_height * 0.5))
                    .with_scroll(Vec2::ZERO),
            ),
        );

        world.spawn(centered_text(
            START_LABEL,
            LABEL_SIZE,
            Color::WHITE,
            Vec2::new(center_x, LABEL_Y),
        ));
        let arrows = format!("> {} <", " ".repeat(START_LABEL.len()));
        self.arrows = Some(world.spawn(centered_text(
            &arrows,
            LABEL_SIZE,
            Color::rgb(0xcc, 0xcc, 0xcc),
            Vec2::new(center_x, LABEL_Y),
        )));

        world.spawn(centered_text(
            "WASD MOVE - SPACE PUNCH - Z BUBBLE",
            HINT_SIZE,
            Color::rgb(0xcc, 0xcc, 0xcc),
            Vec2::new(center_x, height - 22.0),
        ));
        world.spawn(centered_text(
            "ESC QUIT",
            HINT_SIZE,
            Color::rgb(0x88, 0x88, 0x88),
            Vec2::new(center_x, height - 10.0),
        ));

        let sheet = assets.sprites().get(MR_CLEAN_PNG)?;
        let columns = (sheet.width / MASCOT_FRAME).max(1);
        let frame = MASCOT_FRAME as f64;
        self.mascot = Some(
            world.spawn(
                EntityDesc::at(Vec2::new(center_x - MASCOT_WALK_TICKS as f64 * 0.5, MASCOT_Y))
                    .with_graphic(
                        Graphic::animated(
                            MR_CLEAN_PNG,
                            MASCOT_FRAME,
                            MASCOT_FRAME,
                            columns,
                            mascot_sprite()?,
                        )
                        .with_origin(Vec2::new(frame * 0.5, frame)),
                    ),
            ),
        );

        info!(scene = MENU_SCENE_NAME, "menu_loaded");
        Ok(())
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> Result<SceneCommand, SceneError> {
        if input.key_pressed(&Key::Escape) {
            info!(scene = MENU_SCENE_NAME, "quit_requested");
            return Ok(SceneCommand::Quit);
        }
        if input.key_pressed(&START_KEYS) {
            info!(scene = MENU_SCENE_NAME, "level_started");
            return Ok(SceneCommand::Push(Box::new(LevelScene::new(
                self.context.clone(),
            ))));
        }

        if let Some(arrows) = self.arrows.and_then(|id| world.find_entity_mut(id)) {
            arrows.visible = (self.ticks / ARROW_BLINK_TICKS) % 2 == 0;
        }
        self.ticks += 1;
        self.drive_mascot(world)?;
        Ok(SceneCommand::None)
    }

    fn resume(&mut self, _world: &mut SceneWorld) {
        self.ticks = 0;
        self.script.reset();
    }
}
