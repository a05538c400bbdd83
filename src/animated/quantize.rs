//! Frame palette quantization with a reserved transparency index.
//!
//! GIF frames carry at most 256 palette entries, and a rounded frame always
//! needs one of them to be transparent. Two paths produce the indexed
//! buffer:
//!
//! - **Exact**: when the frame holds at most 255 unique RGBA colors, the
//!   palette is built by enumerating them in first-seen order. No dithering,
//!   no loss — re-rounding an already-rounded animation stays stable.
//! - **Dithered**: otherwise, Floyd–Steinberg error diffusion maps each
//!   pixel to the fixed 216-color web-safe reference palette.
//!
//! Both paths leave headroom for the transparency entry, which is appended
//! when no chosen color already has zero alpha. Every pixel whose source
//! alpha is zero is then forced to the transparency index, overriding
//! whatever the quantizer picked — the mask decides visibility, not the
//! color distance.

use crate::error::EngineError;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Unique-color ceiling for the exact path. One entry below the GIF limit
/// so the transparency append always fits.
const EXACT_COLOR_LIMIT: usize = 255;

/// Web-safe reference palette: 6 levels per channel, 216 colors.
static WEB_SAFE: LazyLock<Vec<[u8; 4]>> = LazyLock::new(|| {
    let mut palette = Vec::with_capacity(216);
    for r in 0..6u8 {
        for g in 0..6u8 {
            for b in 0..6u8 {
                palette.push([r * 51, g * 51, b * 51, 255]);
            }
        }
    }
    palette
});

/// An indexed frame ready for GIF encoding.
#[derive(Debug, Clone)]
pub struct QuantizedFrame {
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
    /// RGB triples in GIF palette layout, at most 256 entries.
    pub palette: Vec<u8>,
    /// Index of the reserved transparent entry.
    pub transparent: u8,
}

/// Quantize an RGBA frame to an indexed buffer with a guaranteed
/// transparency index.
pub fn quantize(image: &RgbaImage) -> Result<QuantizedFrame, EngineError> {
    let (mut indices, mut palette) = match exact_palette(image) {
        Some(exact) => exact,
        None => dither_web_safe(image),
    };

    let transparent = match palette.iter().position(|color| color[3] == 0) {
        Some(index) => index as u8,
        None => {
            if palette.len() >= 256 {
                return Err(EngineError::PaletteOverflow);
            }
            palette.push([0, 0, 0, 0]);
            (palette.len() - 1) as u8
        }
    };

    for (pixel, index) in image.pixels().zip(indices.iter_mut()) {
        if pixel[3] == 0 {
            *index = transparent;
        }
    }

    let rgb = palette
        .iter()
        .flat_map(|color| [color[0], color[1], color[2]])
        .collect();

    Ok(QuantizedFrame {
        indices,
        palette: rgb,
        transparent,
    })
}

/// Build an exact palette in first-seen order, or `None` when the frame
/// holds more than [`EXACT_COLOR_LIMIT`] unique colors.
fn exact_palette(image: &RgbaImage) -> Option<(Vec<u8>, Vec<[u8; 4]>)> {
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::new();
    let mut palette: Vec<[u8; 4]> = Vec::new();
    let mut indices = Vec::with_capacity(image.pixels().len());

    for pixel in image.pixels() {
        let rgba = pixel.0;
        let index = match lookup.get(&rgba) {
            Some(&index) => index,
            None => {
                if palette.len() >= EXACT_COLOR_LIMIT {
                    return None;
                }
                let index = palette.len() as u8;
                lookup.insert(rgba, index);
                palette.push(rgba);
                index
            }
        };
        indices.push(index);
    }

    Some((indices, palette))
}

/// Floyd–Steinberg diffusion against the web-safe palette.
///
/// Error is carried as raw sums of `error × weight` and divided by 16 at
/// consumption; the sub-unit remainder that drops out is invisible next to
/// the 51-step palette spacing.
fn dither_web_safe(image: &RgbaImage) -> (Vec<u8>, Vec<[u8; 4]>) {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let mut indices = vec![0u8; width * height];

    let mut current_error = vec![[0i32; 3]; width];
    let mut next_error = vec![[0i32; 3]; width];

    for y in 0..height {
        for x in 0..width {
            let pixel = image.get_pixel(x as u32, y as u32);

            let mut quantized = [0u8; 3];
            let mut error = [0i32; 3];
            let mut index = 0usize;
            for channel in 0..3 {
                let adjusted =
                    (pixel[channel] as i32 + current_error[x][channel] / 16).clamp(0, 255);
                let level = ((adjusted + 25) / 51).min(5);
                quantized[channel] = (level * 51) as u8;
                error[channel] = adjusted - quantized[channel] as i32;
                index = index * 6 + level as usize;
            }
            indices[y * width + x] = index as u8;

            // Classic kernel: 7/16 right, 3/16 below-left, 5/16 below,
            // 1/16 below-right.
            for channel in 0..3 {
                let err = error[channel];
                if x + 1 < width {
                    current_error[x + 1][channel] += err * 7;
                    next_error[x + 1][channel] += err;
                }
                if x > 0 {
                    next_error[x - 1][channel] += err * 3;
                }
                next_error[x][channel] += err * 5;
            }
        }
        std::mem::swap(&mut current_error, &mut next_error);
        next_error.iter_mut().for_each(|e| *e = [0; 3]);
    }

    (indices, WEB_SAFE.clone())
}
