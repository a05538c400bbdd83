//! Data structures describing transform requests.
//!
//! A transform request is an ordered list of operations, and the engine
//! contract fixes the canonical order: resize before rounding. Both the
//! cache key ([`crate::cache::TransformKey`]) and the validator string
//! ([`crate::validator::derive_validator`]) are derived from the same
//! [`Operation`] list, so the two can never disagree about what was applied.

/// Output dimensions for a resize operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square box, the common case for avatars.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// What a caller wants done to an image.
///
/// Both fields optional; `None` (or zero values) means the operation is
/// skipped entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Resample to exactly this box. Aspect ratio is not preserved.
    pub resize_to: Option<Dimensions>,
    /// Apply a rounded-rectangle alpha mask with this corner radius.
    pub round_radius: Option<u32>,
}

impl TransformOptions {
    pub fn new(resize_to: Option<Dimensions>, round_radius: Option<u32>) -> Self {
        Self {
            resize_to,
            round_radius,
        }
    }

    /// The canonical ordered operation list: resize first, then rounding.
    ///
    /// Degenerate requests (zero-sized box, zero radius) are dropped here,
    /// so keys and validators never encode a no-op.
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(2);
        if let Some(dims) = self.resize_to
            && dims.width > 0
            && dims.height > 0
        {
            ops.push(Operation::Resize(dims));
        }
        if let Some(radius) = self.round_radius
            && radius > 0
        {
            ops.push(Operation::Round(radius));
        }
        ops
    }

    /// True when no effective operation was requested.
    pub fn is_passthrough(&self) -> bool {
        self.operations().is_empty()
    }
}

/// A single transform step with its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Resize(Dimensions),
    Round(u32),
}
