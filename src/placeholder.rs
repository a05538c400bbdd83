//! Synthesized fallback images.
//!
//! When a user has no stored avatar or banner, the boundary serves a
//! generated placeholder instead of failing the request. The engine owns
//! the synthesis so every deployment produces identical placeholder bytes
//! without shipping image assets.

use crate::cache;
use crate::error::EngineError;
use crate::raster::{Encoded, Raster, RasterFormat, encode};
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

/// Canonical avatar size served and stored by the system.
pub const AVATAR_SIZE: u32 = 256;

/// Neutral gray avatar placeholder, encoded as JPEG.
pub fn fallback_avatar() -> Result<Encoded, EngineError> {
    let image = RgbImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, Rgb([200, 200, 200]));
    encode(&Raster {
        image: DynamicImage::ImageRgb8(image),
        format: RasterFormat::Jpeg,
    })
}

/// Minimal fully-transparent banner placeholder, encoded as PNG.
///
/// Three by one pixel: browsers stretch it to any banner box, and it stays
/// invisible over whatever the page renders behind it.
pub fn fallback_banner() -> Result<Encoded, EngineError> {
    let image = RgbaImage::new(3, 1);
    encode(&Raster {
        image: DynamicImage::ImageRgba8(image),
        format: RasterFormat::Png { alpha: true },
    })
}

/// Source-identity sentinel for placeholder responses.
///
/// Placeholders have no storage-layer identity (no username, no mtime), so
/// their validator identity is a digest of the bytes themselves.
pub fn content_identity(bytes: &[u8]) -> String {
    cache::hash_bytes(bytes)
}
