use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::assets::Assets;

use super::frame::FrameSurface;

/// Presents a fixed-size logical canvas, scaled to the window by `pixels`.
pub struct Renderer {
    window: &'static Window,
    pixels: Pixels<'static>,
    canvas_width: u32,
    canvas_height: u32,
    assets: Arc<Assets>,
}

impl Renderer {
    pub fn new(
        window: &'static Window,
        canvas_width: u32,
        canvas_height: u32,
        assets: Arc<Assets>,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(window, canvas_width, canvas_height, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            canvas_width,
            canvas_height,
            assets,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            self.window,
            self.canvas_width,
            self.canvas_height,
            width,
            height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: &'static Window,
        canvas_width: u32,
        canvas_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width.max(1), surface_height.max(1), window);
        Pixels::new(canvas_width, canvas_height, surface)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Hands a software surface over the frame buffer to `draw`, then
    /// presents it.
    pub fn render_frame(&mut self, draw: impl FnOnce(&mut FrameSurface<'_>)) -> Result<(), Error> {
        {
            let frame = self.pixels.frame_mut();
            let mut surface = FrameSurface::new(
                frame,
                self.canvas_width,
                self.canvas_height,
                self.assets.sprites(),
            );
            draw(&mut surface);
        }
        self.pixels.render()
    }
}
