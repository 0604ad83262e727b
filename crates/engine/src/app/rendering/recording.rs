use crate::math::{Rect, Vec2};

use super::surface::{Color, DrawSurface, ImageDraw, ShapeStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Image {
        asset: String,
        source: Option<Rect>,
        position: Vec2,
        scale: f64,
        flip_x: bool,
        tint: Option<Color>,
        alpha: f64,
    },
    Rect {
        rect: Rect,
        style: ShapeStyle,
    },
    Circle {
        center: Vec2,
        radius: f64,
        scale_x: f64,
        style: ShapeStyle,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Text {
        text: String,
        position: Vec2,
        size: f64,
        color: Color,
    },
}

/// Headless surface that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Positions of image blits for `asset`, in draw order.
    pub fn image_positions(&self, asset: &str) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Image {
                    asset: drawn,
                    position,
                    ..
                } if drawn == asset => Some(*position),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn image(&mut self, draw: &ImageDraw<'_>) {
        self.calls.push(DrawCall::Image {
            asset: draw.asset.to_string(),
            source: draw.source,
            position: draw.position,
            scale: draw.scale,
            flip_x: draw.flip_x,
            tint: draw.tint,
            alpha: draw.alpha,
        });
    }

    fn rect(&mut self, rect: Rect, style: ShapeStyle) {
        self.calls.push(DrawCall::Rect { rect, style });
    }

    fn circle(&mut self, center: Vec2, radius: f64, scale_x: f64, style: ShapeStyle) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            scale_x,
            style,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn text(&mut self, text: &str, position: Vec2, size: f64, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            position,
            size,
            color,
        });
    }
}
