//! Offscreen RGBA drawing surface.

use super::Transform;
use crate::capture::Frame;

/// Bytes per canvas pixel (RGBA8).
pub const CANVAS_CHANNELS: usize = 4;

/// An offscreen raster with a current transform.
///
/// Resizing clears the raster and resets the transform.
#[derive(Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    transform: Transform,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(300, 150)
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * CANVAS_CHANNELS],
            transform: Transform::IDENTITY,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// RGBA value at `(x, y)`.
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * CANVAS_CHANNELS;
        self.pixels
            .get(offset..offset + CANVAS_CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Draws `frame` scaled into the user-space rectangle
    /// `(dx, dy, dw, dh)` through the current transform.
    ///
    /// Each device pixel centre is mapped back into user space and
    /// sampled nearest-neighbour. Nothing is drawn under a singular
    /// transform.
    pub fn draw_frame(&mut self, frame: &Frame, dx: f64, dy: f64, dw: f64, dh: f64) {
        if dw <= 0.0 || dh <= 0.0 || !frame.is_valid() {
            return;
        }
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let (fw, fh) = (frame.width(), frame.height());
        let row_bytes = (self.width as usize) * CANVAS_CHANNELS;

        for py in 0..self.height {
            for px in 0..self.width {
                let (ux, uy) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if ux < dx || uy < dy || ux >= dx + dw || uy >= dy + dh {
                    continue;
                }
                let sx = (((ux - dx) * fw as f64 / dw) as u32).min(fw - 1);
                let sy = (((uy - dy) * fh as f64 / dh) as u32).min(fh - 1);
                let Some([r, g, b]) = frame.rgb(sx, sy) else {
                    continue;
                };
                let offset = (py as usize) * row_bytes + (px as usize) * CANVAS_CHANNELS;
                self.pixels[offset..offset + CANVAS_CHANNELS].copy_from_slice(&[r, g, b, 255]);
            }
        }
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .finish()
    }
}
