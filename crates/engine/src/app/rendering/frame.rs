use crate::app::assets::{LoadedImage, SpriteStore};
use crate::math::{Rect, Vec2};

use super::font::{glyph_for, text_scale, GLYPH_WIDTH};
use super::surface::{Color, DrawSurface, ImageDraw, ShapeStyle};

const MISSING_IMAGE_COLOR: Color = Color::MAGENTA;
const MISSING_IMAGE_HALF_SIZE_PX: f64 = 5.0;

/// Software RGBA surface over a borrowed frame buffer.
pub struct FrameSurface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    sprites: &'a SpriteStore,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, sprites: &'a SpriteStore) -> Self {
        Self {
            frame,
            width,
            height,
            sprites,
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = color[3] as u32;
        if alpha == 0 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        if alpha == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        let inverse = 255 - alpha;
        for channel in 0..3 {
            dst[channel] =
                ((color[channel] as u32 * alpha + dst[channel] as u32 * inverse) / 255) as u8;
        }
        dst[3] = (alpha + dst[3] as u32 * inverse / 255).min(255) as u8;
    }

    fn fill_rect_px(&mut self, left: i32, top: i32, right: i32, bottom: i32, color: [u8; 4]) {
        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.width as i32);
        let bottom = bottom.min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn draw_missing_image(&mut self, position: Vec2) {
        let rect = Rect::new(
            position.x,
            position.y,
            MISSING_IMAGE_HALF_SIZE_PX * 2.0,
            MISSING_IMAGE_HALF_SIZE_PX * 2.0,
        );
        self.rect(rect, ShapeStyle::Stroke(MISSING_IMAGE_COLOR));
    }
}

impl DrawSurface for FrameSurface<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        let rgba = color.to_array();
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn image(&mut self, draw: &ImageDraw<'_>) {
        let sprites = self.sprites;
        let Ok(image) = sprites.get(draw.asset) else {
            self.draw_missing_image(draw.position);
            return;
        };
        let source = draw
            .source
            .unwrap_or_else(|| Rect::new(0.0, 0.0, image.width as f64, image.height as f64));
        let scale = if draw.scale.is_finite() && draw.scale > 0.0 {
            draw.scale
        } else {
            1.0
        };
        let dest_w = (source.width * scale).round() as i32;
        let dest_h = (source.height * scale).round() as i32;
        if dest_w <= 0 || dest_h <= 0 {
            return;
        }
        let left = draw.position.x.round() as i32;
        let top = draw.position.y.round() as i32;
        let opacity = if draw.alpha.is_finite() {
            draw.alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };

        for dy in 0..dest_h {
            let out_y = top + dy;
            if out_y < 0 || out_y >= self.height as i32 {
                continue;
            }
            let src_y = source.y as i64 + ((dy as f64) / scale).floor() as i64;
            for dx in 0..dest_w {
                let out_x = left + dx;
                if out_x < 0 || out_x >= self.width as i32 {
                    continue;
                }
                let column = if draw.flip_x { dest_w - 1 - dx } else { dx };
                let src_x = source.x as i64 + ((column as f64) / scale).floor() as i64;
                let Some(pixel) = sample(image, src_x, src_y) else {
                    continue;
                };
                let pixel = shade(pixel, draw.tint, opacity);
                self.blend_pixel(out_x, out_y, pixel);
            }
        }
    }

    fn rect(&mut self, rect: Rect, style: ShapeStyle) {
        let left = rect.x.round() as i32;
        let top = rect.y.round() as i32;
        let right = rect.right().round() as i32;
        let bottom = rect.bottom().round() as i32;
        match style {
            ShapeStyle::Fill(color) => self.fill_rect_px(left, top, right, bottom, color.to_array()),
            ShapeStyle::Stroke(color) => {
                let rgba = color.to_array();
                self.fill_rect_px(left, top, right, top + 1, rgba);
                self.fill_rect_px(left, bottom - 1, right, bottom, rgba);
                self.fill_rect_px(left, top + 1, left + 1, bottom - 1, rgba);
                self.fill_rect_px(right - 1, top + 1, right, bottom - 1, rgba);
            }
        }
    }

    fn circle(&mut self, center: Vec2, radius: f64, scale_x: f64, style: ShapeStyle) {
        if radius.is_nan() || radius <= 0.0 || scale_x.is_nan() || scale_x <= 0.0 {
            return;
        }
        let rgba = style.color().to_array();
        let radius_x = radius * scale_x;
        let min_x = (center.x - radius_x).floor() as i32;
        let max_x = (center.x + radius_x).ceil() as i32;
        let min_y = (center.y - radius).floor() as i32;
        let max_y = (center.y + radius).ceil() as i32;
        let inner = (radius - 1.0).max(0.0);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let nx = (x as f64 + 0.5 - center.x) / scale_x;
                let ny = y as f64 + 0.5 - center.y;
                let distance = (nx * nx + ny * ny).sqrt();
                let inside = match style {
                    ShapeStyle::Fill(_) => distance <= radius,
                    ShapeStyle::Stroke(_) => distance <= radius && distance >= inner,
                };
                if inside {
                    self.blend_pixel(x, y, rgba);
                }
            }
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let rgba = color.to_array();
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        loop {
            self.blend_pixel(x0, y0, rgba);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                x0 += step_x;
            }
            if doubled <= dx {
                error += dx;
                y0 += step_y;
            }
        }
    }

    fn text(&mut self, text: &str, position: Vec2, size: f64, color: Color) {
        let scale = text_scale(size);
        let rgba = color.to_array();
        let mut x = position.x.round() as i32;
        let y = position.y.round() as i32;
        for ch in text.chars() {
            let glyph = glyph_for(ch);
            for (row_index, row_bits) in glyph.iter().enumerate() {
                let glyph_y = y + row_index as i32 * scale;
                for col in 0..GLYPH_WIDTH {
                    if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                        continue;
                    }
                    let glyph_x = x + col * scale;
                    self.fill_rect_px(glyph_x, glyph_y, glyph_x + scale, glyph_y + scale, rgba);
                }
            }
            x += (GLYPH_WIDTH + 1) * scale;
        }
    }
}

fn sample(image: &LoadedImage, x: i64, y: i64) -> Option<[u8; 4]> {
    if x < 0 || y < 0 {
        return None;
    }
    image.pixel(u32::try_from(x).ok()?, u32::try_from(y).ok()?)
}

fn shade(pixel: [u8; 4], tint: Option<Color>, opacity: f64) -> [u8; 4] {
    let mut out = pixel;
    if let Some(tint) = tint {
        let weight = tint.a as u32;
        let inverse = 255 - weight;
        out[0] = ((tint.r as u32 * weight + pixel[0] as u32 * inverse) / 255) as u8;
        out[1] = ((tint.g as u32 * weight + pixel[1] as u32 * inverse) / 255) as u8;
        out[2] = ((tint.b as u32 * weight + pixel[2] as u32 * inverse) / 255) as u8;
    }
    out[3] = (pixel[3] as f64 * opacity).round() as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::assets::AssetManager;

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn filled_rect_is_clipped_to_frame() {
        let sprites = SpriteStore::default();
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut surface = FrameSurface::new(&mut frame, 4, 4, &sprites);
        surface.rect(Rect::new(-2.0, 2.0, 10.0, 10.0), ShapeStyle::Fill(Color::RED));
        assert_eq!(pixel_at(&frame, 4, 0, 1), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&frame, 4, 3, 3), Color::RED.to_array());
    }

    #[test]
    fn half_alpha_blends_over_background() {
        let sprites = SpriteStore::default();
        let mut frame = vec![0u8; 4];
        let mut surface = FrameSurface::new(&mut frame, 1, 1, &sprites);
        surface.clear(Color::BLACK);
        surface.rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            ShapeStyle::Fill(Color::rgba(255, 255, 255, 128)),
        );
        let pixel = pixel_at(&frame, 1, 0, 0);
        assert_eq!(pixel[0], 128);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn missing_image_draws_marker_instead_of_panicking() {
        let assets = AssetManager::new("unused").load_assets();
        let mut frame = vec![0u8; 16 * 16 * 4];
        let mut surface = FrameSurface::new(&mut frame, 16, 16, assets.sprites());
        surface.image(&ImageDraw {
            asset: "nope.png",
            source: None,
            position: Vec2::ZERO,
            scale: 1.0,
            flip_x: false,
            tint: None,
            alpha: 1.0,
        });
        assert_eq!(pixel_at(&frame, 16, 0, 0), MISSING_IMAGE_COLOR.to_array());
    }

    #[test]
    fn line_covers_both_endpoints() {
        let sprites = SpriteStore::default();
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut surface = FrameSurface::new(&mut frame, 8, 8, &sprites);
        surface.line(Vec2::new(1.0, 1.0), Vec2::new(6.0, 4.0), Color::WHITE);
        assert_eq!(pixel_at(&frame, 8, 1, 1), Color::WHITE.to_array());
        assert_eq!(pixel_at(&frame, 8, 6, 4), Color::WHITE.to_array());
    }

    #[test]
    fn text_draws_glyph_pixels() {
        let sprites = SpriteStore::default();
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut surface = FrameSurface::new(&mut frame, 8, 8, &sprites);
        surface.text("I", Vec2::ZERO, 5.0, Color::WHITE);
        assert_eq!(pixel_at(&frame, 8, 0, 0), Color::WHITE.to_array());
        assert_eq!(pixel_at(&frame, 8, 0, 1), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&frame, 8, 1, 2), Color::WHITE.to_array());
    }
}
