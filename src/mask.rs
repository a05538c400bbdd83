//! Rounded-rectangle masking geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! A pixel is excluded from the visible region only within the four
//! `radius × radius` corner squares; inside a corner square it is kept iff
//! its integer squared distance to that corner's circle center is at most
//! `radius²`. Corner centers sit one pixel inside the last masked column and
//! row (`width - radius - 1`, `height - radius - 1`); that exact inset is
//! what makes repeated masking of the same image a byte-identical no-op.

/// Clamp a requested corner radius to what the image can geometrically hold.
///
/// A radius larger than half the shorter dimension degenerates to exactly
/// that half, so opposite corner circles never overlap.
pub fn clamp_radius(width: u32, height: u32, radius: u32) -> u32 {
    radius.min(width / 2).min(height / 2)
}

/// Whether pixel `(x, y)` lies inside the rounded region of a
/// `width × height` image with the given corner radius.
///
/// The radius is clamped via [`clamp_radius`] before use, so callers may
/// pass the raw requested value. A radius of zero keeps every pixel.
pub fn in_rounded_region(x: u32, y: u32, width: u32, height: u32, radius: u32) -> bool {
    let r = clamp_radius(width, height, radius);
    if r == 0 {
        return true;
    }

    let near_left = x < r;
    let near_right = x >= width - r;
    let near_top = y < r;
    let near_bottom = y >= height - r;

    let (cx, cy) = match (near_left, near_right, near_top, near_bottom) {
        (true, _, true, _) => (r, r),
        (_, true, true, _) => (width - r - 1, r),
        (true, _, _, true) => (r, height - r - 1),
        (_, true, _, true) => (width - r - 1, height - r - 1),
        _ => return true,
    };

    let dx = x as i64 - cx as i64;
    let dy = y as i64 - cy as i64;
    dx * dx + dy * dy <= (r as i64) * (r as i64)
}
