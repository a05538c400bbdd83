//! Engine error taxonomy.
//!
//! Every variant is local to a single transform attempt — none is fatal to
//! the process, and the cache is only written after a fully successful
//! transform, so callers never observe a partially-written entry. The
//! boundary layer decides whether a failed transform becomes an HTTP error
//! or a placeholder response; the engine never guesses a fallback.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Source bytes are malformed or in an unsupported format.
    #[error("failed to decode source image: {0}")]
    Decode(String),

    /// Output serialization failed.
    #[error("failed to encode transformed image: {0}")]
    Encode(String),

    /// The animation contains no frames.
    #[error("animation has no frames")]
    EmptyAnimation,

    /// The frame palette is full (256 entries) and none of them is
    /// transparent, so the reserved transparency index cannot be added.
    #[error("no palette slot available for a transparency entry")]
    PaletteOverflow,

    /// A per-frame failure that aborted the whole animated transform.
    #[error("failed to process animation frame {frame}: {source}")]
    AnimationProcessing {
        frame: usize,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Wrap a per-frame failure with the index of the offending frame.
    pub(crate) fn in_frame(self, frame: usize) -> Self {
        EngineError::AnimationProcessing {
            frame,
            source: Box::new(self),
        }
    }
}
