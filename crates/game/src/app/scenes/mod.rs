use canvas_lord::{measure_text, Color, EntityDesc, Graphic, Key, Vec2};

mod menu;
mod pause;
mod results;

pub(crate) use super::gameplay::LevelScene;
pub(crate) use menu::MenuScene;
pub(crate) use pause::PauseScene;
pub(crate) use results::ResultsScene;

/// Keys that dismiss the results card.
const CONTINUE_KEYS: [Key; 4] = [Key::Space, Key::Enter, Key::Z, Key::X];

/// Screen-fixed text entity centred on `at`.
fn centered_text(text: &str, size: f64, color: Color, at: Vec2) -> EntityDesc {
    let width = measure_text(text, size);
    EntityDesc::at(at).with_graphic(
        Graphic::text(text, size, color)
            .with_origin(Vec2::new(width * 0.5, size * 0.5))
            .with_scroll(Vec2::ZERO),
    )
}
