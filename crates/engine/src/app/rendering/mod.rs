mod font;
mod frame;
mod recording;
mod renderer;
mod surface;
mod transform;

pub use frame::FrameSurface;
pub use recording::{DrawCall, RecordingSurface};
pub use renderer::Renderer;
pub use surface::{Color, DrawSurface, ImageDraw, ShapeStyle};
pub(crate) use transform::clamp_scroll;
pub use transform::world_to_screen;

/// Width in pixels of `text` drawn with the built-in font at `size`.
pub fn measure_text(text: &str, size: f64) -> f64 {
    font::text_width_px(text, font::text_scale(size)) as f64
}
