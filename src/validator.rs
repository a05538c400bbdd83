//! Validator (ETag) derivation.
//!
//! A validator is an opaque string identifying one specific response
//! representation: the source identity plus a suffix per applied modifier,
//! rendered in the same canonical order the transform pipeline applies them
//! (size before rounding). Equality of validator strings is the sole
//! criterion for a conditional-request short-circuit — once a validator
//! exists, "has this changed?" is an O(1) string comparison regardless of
//! how expensive the transform behind it was.
//!
//! The identity token comes from the storage layer (for example a hash of
//! modification time and username), or from
//! [`crate::placeholder::content_identity`] when the default placeholder is
//! served. Two requests produce the same validator iff they would produce
//! byte-identical output for that identity.

use crate::params::{Operation, TransformOptions};
use std::fmt::Write;

/// Build the validator string for `source_identity` with `ops` applied in
/// order.
///
/// Square resizes render as `-size-N`, non-square as `-size-WxH`; rounding
/// renders as `-rounded-Rpx`. The radius is part of the suffix so two
/// different radii never share a validator.
pub fn derive_validator(source_identity: &str, ops: &[Operation]) -> String {
    let mut validator = String::from(source_identity);
    for op in ops {
        match op {
            Operation::Resize(dims) if dims.is_square() => {
                let _ = write!(validator, "-size-{}", dims.width);
            }
            Operation::Resize(dims) => {
                let _ = write!(validator, "-size-{}x{}", dims.width, dims.height);
            }
            Operation::Round(radius) => {
                let _ = write!(validator, "-rounded-{radius}px");
            }
        }
    }
    validator
}

/// Convenience wrapper taking a whole options struct.
pub fn validator_for(source_identity: &str, opts: &TransformOptions) -> String {
    derive_validator(source_identity, &opts.operations())
}
