use crate::math::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(220, 40, 40);
    pub const GREEN: Color = Color::rgb(60, 200, 90);
    pub const YELLOW: Color = Color::rgb(250, 220, 60);
    pub const CYAN: Color = Color::rgb(80, 220, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scales the alpha channel by `factor`, clamped to [0, 1].
    pub fn faded(self, factor: f64) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            a: (self.a as f64 * factor).round() as u8,
            ..self
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeStyle {
    Fill(Color),
    Stroke(Color),
}

impl ShapeStyle {
    pub fn color(self) -> Color {
        match self {
            ShapeStyle::Fill(color) | ShapeStyle::Stroke(color) => color,
        }
    }
}

/// One image blit in screen space. `position` is the top-left corner after
/// origin and scale are applied; `source` selects a sub-rectangle of the
/// image, or the whole image when `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDraw<'a> {
    pub asset: &'a str,
    pub source: Option<Rect>,
    pub position: Vec2,
    pub scale: f64,
    pub flip_x: bool,
    pub tint: Option<Color>,
    pub alpha: f64,
}

/// Opaque drawing context the runtime issues its draw calls against.
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Color);
    fn image(&mut self, draw: &ImageDraw<'_>);
    fn rect(&mut self, rect: Rect, style: ShapeStyle);
    /// `scale_x` stretches the circle horizontally into an ellipse.
    fn circle(&mut self, center: Vec2, radius: f64, scale_x: f64, style: ShapeStyle);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn text(&mut self, text: &str, position: Vec2, size: f64, color: Color);
}
