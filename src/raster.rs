//! Static (single-frame) raster transforms.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` + `image::guess_format` |
//! | **Resize** | `DynamicImage::resize_exact` with `Lanczos3` |
//! | **Round** | per-pixel mask from [`crate::mask`] over an RGBA canvas |
//! | **Encode → JPEG** | `JpegEncoder::new_with_quality` (quality 85) |
//! | **Encode → PNG** | `PngEncoder` (full 8-bit alpha) |
//!
//! Decode produces a [`Raster`]: the pixel grid tagged with a
//! [`RasterFormat`] variant, so downstream operations dispatch on the
//! variant instead of on ad hoc content-type strings. JPEG and PNG are the
//! recognized static encodings; any other decodable format is treated as a
//! generic opaque raster and leaves the engine as JPEG. Rounding introduces
//! alpha, so rounded output is always PNG regardless of input.

use crate::error::EngineError;
use crate::mask;
use crate::params::{Dimensions, TransformOptions};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// JPEG re-encode quality for opaque output.
const JPEG_QUALITY: u8 = 85;

/// Encoding a decoded static image maps back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// JPEG, or any other opaque format we treat as generic.
    Jpeg,
    /// PNG; `alpha` records whether the source carried an alpha channel.
    Png { alpha: bool },
}

impl RasterFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png { .. } => "image/png",
        }
    }
}

/// A decoded single-frame image with its format tag.
#[derive(Debug, Clone)]
pub struct Raster {
    pub image: DynamicImage,
    pub format: RasterFormat,
}

/// Encoded transform output: bytes plus the content type they decode as.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

/// Decode source bytes into a tagged raster.
pub fn decode(source: &[u8]) -> Result<Raster, EngineError> {
    let format = image::guess_format(source).map_err(|e| EngineError::Decode(e.to_string()))?;
    let image = image::load_from_memory(source).map_err(|e| EngineError::Decode(e.to_string()))?;

    let format = match format {
        ImageFormat::Png => RasterFormat::Png {
            alpha: image.color().has_alpha(),
        },
        _ => RasterFormat::Jpeg,
    };

    Ok(Raster { image, format })
}

/// Resample to exactly the requested box. Aspect ratio is not preserved;
/// callers wanting square output pass equal dimensions.
pub fn resize(raster: Raster, target: Dimensions) -> Raster {
    let image = raster
        .image
        .resize_exact(target.width, target.height, FilterType::Lanczos3);
    Raster { image, ..raster }
}

/// Apply the rounded-rectangle mask, forcing alpha to zero outside the
/// region. The result is always PNG-shaped since masking introduces alpha.
///
/// A radius that clamps to zero is a no-op and keeps the original format.
pub fn round(raster: Raster, radius: u32) -> Raster {
    let (width, height) = (raster.image.width(), raster.image.height());
    if mask::clamp_radius(width, height, radius) == 0 {
        return raster;
    }

    let source = raster.image.to_rgba8();
    let mut masked = RgbaImage::new(width, height);
    for (x, y, pixel) in masked.enumerate_pixels_mut() {
        *pixel = if mask::in_rounded_region(x, y, width, height, radius) {
            *source.get_pixel(x, y)
        } else {
            Rgba([0, 0, 0, 0])
        };
    }

    Raster {
        image: DynamicImage::ImageRgba8(masked),
        format: RasterFormat::Png { alpha: true },
    }
}

/// Re-encode a raster according to its format tag.
pub fn encode(raster: &Raster) -> Result<Encoded, EngineError> {
    let mut data = Vec::new();
    match raster.format {
        RasterFormat::Jpeg => {
            // JPEG has no alpha channel; flatten before encoding.
            let rgb = raster.image.to_rgb8();
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut data), JPEG_QUALITY);
            rgb.write_with_encoder(encoder)
                .map_err(|e| EngineError::Encode(e.to_string()))?;
        }
        RasterFormat::Png { .. } => {
            let rgba = raster.image.to_rgba8();
            let encoder = PngEncoder::new(Cursor::new(&mut data));
            rgba.write_with_encoder(encoder)
                .map_err(|e| EngineError::Encode(e.to_string()))?;
        }
    }
    Ok(Encoded {
        data,
        content_type: raster.format.content_type(),
    })
}

/// Run the full static pipeline: decode, then the canonical resize → round
/// order, then re-encode.
pub fn transform_static(source: &[u8], opts: &TransformOptions) -> Result<Encoded, EngineError> {
    let mut raster = decode(source)?;
    if let Some(target) = opts.resize_to
        && target.width > 0
        && target.height > 0
    {
        raster = resize(raster, target);
    }
    if let Some(radius) = opts.round_radius
        && radius > 0
    {
        raster = round(raster, radius);
    }
    encode(&raster)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a flat-color JPEG in memory.
    fn test_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([180, 40, 90]));
        let mut data = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut data), 90);
        img.write_with_encoder(encoder).unwrap();
        data
    }

    /// Encode an RGBA PNG in memory.
    fn test_png(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, alpha]));
        let mut data = Vec::new();
        img.write_with_encoder(PngEncoder::new(Cursor::new(&mut data)))
            .unwrap();
        data
    }

    // =========================================================================
    // Decode
    // =========================================================================

    #[test]
    fn decode_tags_jpeg() {
        let raster = decode(&test_jpeg(8, 8)).unwrap();
        assert_eq!(raster.format, RasterFormat::Jpeg);
        assert_eq!(raster.format.content_type(), "image/jpeg");
    }

    #[test]
    fn decode_tags_png_with_alpha() {
        let raster = decode(&test_png(8, 8, 128)).unwrap();
        assert_eq!(raster.format, RasterFormat::Png { alpha: true });
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(b"not an image at all").unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[test]
    fn decode_rejects_truncated_jpeg() {
        let mut data = test_jpeg(32, 32);
        data.truncate(20);
        assert!(matches!(decode(&data), Err(EngineError::Decode(_))));
    }

    // =========================================================================
    // Resize
    // =========================================================================

    #[test]
    fn resize_hits_exact_box() {
        let raster = decode(&test_jpeg(256, 256)).unwrap();
        let resized = resize(raster, Dimensions::square(128));
        assert_eq!(resized.image.width(), 128);
        assert_eq!(resized.image.height(), 128);
        assert_eq!(resized.format, RasterFormat::Jpeg);
    }

    #[test]
    fn resize_ignores_aspect_ratio() {
        let raster = decode(&test_jpeg(200, 100)).unwrap();
        let resized = resize(raster, Dimensions::new(64, 64));
        assert_eq!(resized.image.width(), 64);
        assert_eq!(resized.image.height(), 64);
    }

    // =========================================================================
    // Round
    // =========================================================================

    #[test]
    fn round_switches_format_to_png() {
        let raster = decode(&test_jpeg(64, 64)).unwrap();
        let rounded = round(raster, 8);
        assert_eq!(rounded.format, RasterFormat::Png { alpha: true });
    }

    #[test]
    fn round_zero_radius_is_noop() {
        let raster = decode(&test_jpeg(64, 64)).unwrap();
        let rounded = round(raster, 0);
        assert_eq!(rounded.format, RasterFormat::Jpeg);
    }

    #[test]
    fn round_masks_corners_keeps_interior() {
        let raster = decode(&test_jpeg(64, 64)).unwrap();
        let rounded = round(raster, 16);
        let rgba = rounded.image.to_rgba8();

        assert_eq!(rgba.get_pixel(0, 0)[3], 0, "corner must be transparent");
        assert_eq!(rgba.get_pixel(63, 0)[3], 0);
        assert_eq!(rgba.get_pixel(0, 63)[3], 0);
        assert_eq!(rgba.get_pixel(63, 63)[3], 0);
        assert_eq!(rgba.get_pixel(32, 32)[3], 255, "interior must be opaque");
        assert_eq!(rgba.get_pixel(32, 0)[3], 255, "edge midpoint must be kept");
    }

    /// Masked pixels are already transparent, so re-masking with the same
    /// radius is byte-identical.
    #[test]
    fn round_is_idempotent() {
        let raster = decode(&test_jpeg(64, 64)).unwrap();
        let once = encode(&round(raster, 12)).unwrap();

        let again = transform_static(&once.data, &TransformOptions::new(None, Some(12))).unwrap();
        assert_eq!(once.data, again.data);
    }

    // =========================================================================
    // Full pipeline
    // =========================================================================

    #[test]
    fn jpeg_resize_only_stays_jpeg() {
        // 256×256 opaque JPEG avatar, resize=128, no radius.
        let opts = TransformOptions::new(Some(Dimensions::square(128)), None);
        let out = transform_static(&test_jpeg(256, 256), &opts).unwrap();

        assert_eq!(out.content_type, "image/jpeg");
        assert!(!out.data.is_empty());
        let reloaded = decode(&out.data).unwrap();
        assert_eq!(reloaded.image.width(), 128);
        assert_eq!(reloaded.image.height(), 128);
        assert!(!reloaded.image.color().has_alpha());
    }

    #[test]
    fn png_resize_only_stays_png() {
        let opts = TransformOptions::new(Some(Dimensions::square(16)), None);
        let out = transform_static(&test_png(32, 32, 255), &opts).unwrap();
        assert_eq!(out.content_type, "image/png");
    }

    #[test]
    fn jpeg_round_becomes_png_with_quarter_circle_corners() {
        // Same JPEG, radius=16: 256×256 PNG whose 16×16 corner squares are
        // alpha-0 outside the quarter circle and alpha-255 inside it.
        let opts = TransformOptions::new(None, Some(16));
        let out = transform_static(&test_jpeg(256, 256), &opts).unwrap();
        assert_eq!(out.content_type, "image/png");

        let rgba = image::load_from_memory(&out.data).unwrap().to_rgba8();
        assert_eq!(rgba.width(), 256);
        assert_eq!(rgba.height(), 256);
        for y in 0..16 {
            for x in 0..16 {
                let expected = crate::mask::in_rounded_region(x, y, 256, 256, 16);
                let alpha = rgba.get_pixel(x, y)[3];
                assert_eq!(alpha == 255, expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn resize_then_round_applies_both() {
        let opts = TransformOptions::new(Some(Dimensions::square(64)), Some(8));
        let out = transform_static(&test_jpeg(256, 256), &opts).unwrap();
        assert_eq!(out.content_type, "image/png");

        let rgba = image::load_from_memory(&out.data).unwrap().to_rgba8();
        assert_eq!(rgba.width(), 64);
        assert_eq!(rgba.get_pixel(0, 0)[3], 0);
        assert_eq!(rgba.get_pixel(32, 32)[3], 255);
    }
}
