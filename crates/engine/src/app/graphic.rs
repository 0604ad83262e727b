use crate::math::{Rect, Vec2};

use super::rendering::{
    clamp_scroll, world_to_screen, Color, DrawSurface, ImageDraw, ShapeStyle,
};
use super::sprite::{AnimatedSprite, AnimationEvent};

#[derive(Debug, Clone)]
pub enum GraphicKind {
    Image {
        asset: String,
        source: Option<Rect>,
    },
    /// Sprite sheet laid out left-to-right, top-to-bottom in `columns`.
    Animated {
        asset: String,
        frame_width: u32,
        frame_height: u32,
        columns: u32,
        sprite: AnimatedSprite,
    },
    Rect {
        width: f64,
        height: f64,
        style: ShapeStyle,
    },
    Circle {
        radius: f64,
        scale_x: f64,
        style: ShapeStyle,
    },
    Text {
        text: String,
        size: f64,
        color: Color,
    },
    List(Vec<Graphic>),
}

#[derive(Debug, Clone)]
pub struct Graphic {
    pub kind: GraphicKind,
    pub offset: Vec2,
    /// Pivot in unscaled pixels, subtracted before scaling.
    pub origin: Vec2,
    /// Camera follow per axis, kept within [0, 1].
    pub scroll: Vec2,
    pub scale: f64,
    pub flip_x: bool,
    pub tint: Option<Color>,
    pub alpha: f64,
    pub visible: bool,
}

impl Graphic {
    pub fn new(kind: GraphicKind) -> Self {
        Self {
            kind,
            offset: Vec2::ZERO,
            origin: Vec2::ZERO,
            scroll: Vec2::new(1.0, 1.0),
            scale: 1.0,
            flip_x: false,
            tint: None,
            alpha: 1.0,
            visible: true,
        }
    }

    pub fn image(asset: impl Into<String>) -> Self {
        Self::new(GraphicKind::Image {
            asset: asset.into(),
            source: None,
        })
    }

    pub fn animated(
        asset: impl Into<String>,
        frame_width: u32,
        frame_height: u32,
        columns: u32,
        sprite: AnimatedSprite,
    ) -> Self {
        Self::new(GraphicKind::Animated {
            asset: asset.into(),
            frame_width,
            frame_height,
            columns: columns.max(1),
            sprite,
        })
    }

    pub fn rect(width: f64, height: f64, style: ShapeStyle) -> Self {
        Self::new(GraphicKind::Rect {
            width,
            height,
            style,
        })
    }

    pub fn circle(radius: f64, scale_x: f64, style: ShapeStyle) -> Self {
        Self::new(GraphicKind::Circle {
            radius,
            scale_x,
            style,
        })
    }

    pub fn text(text: impl Into<String>, size: f64, color: Color) -> Self {
        Self::new(GraphicKind::Text {
            text: text.into(),
            size,
            color,
        })
    }

    pub fn list(children: Vec<Graphic>) -> Self {
        Self::new(GraphicKind::List(children))
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = clamp_scroll(scroll);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// This graphic if it is animated, otherwise the first animated child of
    /// a list, searched depth first.
    pub fn animated_layer(&self) -> Option<&Graphic> {
        match &self.kind {
            GraphicKind::Animated { .. } => Some(self),
            GraphicKind::List(children) => children.iter().find_map(Graphic::animated_layer),
            _ => None,
        }
    }

    pub fn animated_layer_mut(&mut self) -> Option<&mut Graphic> {
        if matches!(self.kind, GraphicKind::Animated { .. }) {
            return Some(self);
        }
        match &mut self.kind {
            GraphicKind::List(children) => children
                .iter_mut()
                .find_map(Graphic::animated_layer_mut),
            _ => None,
        }
    }

    pub fn sprite(&self) -> Option<&AnimatedSprite> {
        match &self.animated_layer()?.kind {
            GraphicKind::Animated { sprite, .. } => Some(sprite),
            _ => None,
        }
    }

    pub fn sprite_mut(&mut self) -> Option<&mut AnimatedSprite> {
        match &mut self.animated_layer_mut()?.kind {
            GraphicKind::Animated { sprite, .. } => Some(sprite),
            _ => None,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        if let GraphicKind::Text { text, .. } = &mut self.kind {
            *text = value.into();
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Graphic>> {
        match &mut self.kind {
            GraphicKind::List(children) => Some(children),
            _ => None,
        }
    }

    /// Advances the owned sprite, if any. Lists tick every child.
    pub fn tick(&mut self) -> Option<AnimationEvent> {
        match &mut self.kind {
            GraphicKind::Animated { sprite, .. } => sprite.tick(),
            GraphicKind::List(children) => children
                .iter_mut()
                .filter_map(Graphic::tick)
                .fold(None, |first, event| first.or(Some(event))),
            _ => None,
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, anchor: Vec2, camera: Vec2) {
        if !self.visible || self.alpha <= 0.0 {
            return;
        }
        let screen = world_to_screen(anchor, self.offset, camera, self.scroll);
        let top_left = screen - self.origin.scale(self.scale);
        match &self.kind {
            GraphicKind::Image { asset, source } => {
                surface.image(&ImageDraw {
                    asset,
                    source: *source,
                    position: top_left,
                    scale: self.scale,
                    flip_x: self.flip_x,
                    tint: self.tint,
                    alpha: self.alpha,
                });
            }
            GraphicKind::Animated {
                asset,
                frame_width,
                frame_height,
                columns,
                sprite,
            } => {
                let Some(frame) = sprite.frame_id() else {
                    return;
                };
                surface.image(&ImageDraw {
                    asset,
                    source: Some(sheet_frame_rect(frame, *frame_width, *frame_height, *columns)),
                    position: top_left,
                    scale: self.scale,
                    flip_x: self.flip_x,
                    tint: self.tint,
                    alpha: self.alpha,
                });
            }
            GraphicKind::Rect {
                width,
                height,
                style,
            } => {
                let rect = Rect::new(
                    top_left.x,
                    top_left.y,
                    width * self.scale,
                    height * self.scale,
                );
                surface.rect(rect, self.faded_style(*style));
            }
            GraphicKind::Circle {
                radius,
                scale_x,
                style,
            } => {
                surface.circle(
                    top_left,
                    radius * self.scale,
                    *scale_x,
                    self.faded_style(*style),
                );
            }
            GraphicKind::Text { text, size, color } => {
                surface.text(text, top_left, size * self.scale, color.faded(self.alpha));
            }
            GraphicKind::List(children) => {
                let child_anchor = anchor + self.offset;
                for child in children {
                    child.draw(surface, child_anchor, camera);
                }
            }
        }
    }

    fn faded_style(&self, style: ShapeStyle) -> ShapeStyle {
        match style {
            ShapeStyle::Fill(color) => ShapeStyle::Fill(color.faded(self.alpha)),
            ShapeStyle::Stroke(color) => ShapeStyle::Stroke(color.faded(self.alpha)),
        }
    }
}

pub fn sheet_frame_rect(frame: usize, frame_width: u32, frame_height: u32, columns: u32) -> Rect {
    let columns = columns.max(1) as usize;
    let column = frame % columns;
    let row = frame / columns;
    Rect::new(
        (column as u32 * frame_width) as f64,
        (row as u32 * frame_height) as f64,
        frame_width as f64,
        frame_height as f64,
    )
}
