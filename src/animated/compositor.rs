//! Compositor canvas for animation frames.
//!
//! GIF frames are compositing deltas, not full-canvas replacements: a frame
//! may cover only a sub-rectangle and rely on whatever the previous frames
//! left behind. The compositor accumulates the visually-correct current
//! state exactly as a renderer would, so the rounding pass can mask what a
//! viewer actually sees rather than the raw per-frame delta.
//!
//! Disposal is the caller's job: the rounding loop snapshots before drawing
//! a `Previous`-disposal frame and applies the disposal effect after the
//! frame's snapshot has been taken, mirroring the "what happens after
//! displaying this frame" semantics of the format.

use super::AnimatedFrame;
use image::{Rgba, RgbaImage};

pub struct Compositor {
    canvas: RgbaImage,
    background: Rgba<u8>,
}

impl Compositor {
    /// A canvas initialized to the animation's background color (or
    /// transparent when the background index is absent or invalid).
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    /// Copy of the current composited state.
    pub fn snapshot(&self) -> RgbaImage {
        self.canvas.clone()
    }

    /// Replace the canvas with an earlier snapshot (disposal `Previous`).
    pub fn restore(&mut self, snapshot: RgbaImage) {
        self.canvas = snapshot;
    }

    /// Draw a frame delta at its bounding rectangle using source-over.
    ///
    /// GIF pixels are either fully opaque or the transparent index, so
    /// "over" reduces to copy-unless-transparent. Pixels falling outside
    /// the canvas are clipped.
    pub fn draw_over(&mut self, frame: &AnimatedFrame, global_palette: &[u8]) {
        let (canvas_w, canvas_h) = self.canvas.dimensions();
        for frame_y in 0..frame.height as u32 {
            let y = frame.top as u32 + frame_y;
            if y >= canvas_h {
                break;
            }
            for frame_x in 0..frame.width as u32 {
                let x = frame.left as u32 + frame_x;
                if x >= canvas_w {
                    break;
                }
                let offset = (frame_y * frame.width as u32 + frame_x) as usize;
                let Some(&index) = frame.indices.get(offset) else {
                    return;
                };
                if let Some(color) = frame.color(index, global_palette) {
                    self.canvas.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Repaint a frame's rectangle with the background color (disposal
    /// `Background`).
    pub fn clear_rect(&mut self, left: u16, top: u16, width: u16, height: u16) {
        let (canvas_w, canvas_h) = self.canvas.dimensions();
        let x_end = (left as u32 + width as u32).min(canvas_w);
        let y_end = (top as u32 + height as u32).min(canvas_h);
        for y in top as u32..y_end {
            for x in left as u32..x_end {
                self.canvas.put_pixel(x, y, self.background);
            }
        }
    }
}
