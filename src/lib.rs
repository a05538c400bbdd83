//! # Roundel
//!
//! An image transform and cache engine for per-user avatar and banner
//! serving. The engine receives raw encoded image bytes plus transform
//! parameters and returns transformed encoded bytes, a content type, and a
//! validator (ETag) — HTTP routing, auth, and storage stay with the caller.
//!
//! # Architecture: Transform Pipeline Behind a Cache
//!
//! ```text
//! request ──► validator ──► cache lookup ──► transform ──► cache store
//!             (O(1) string)  (content hash)   (CPU bound)
//! ```
//!
//! Three properties make this shape work:
//!
//! - **Content-addressed keys**: cache keys hash the source bytes and the
//!   ordered parameter list, so a new upload can never alias a stale entry.
//! - **Canonical operation order**: resize always precedes rounding. The
//!   key, the validator, and the pipeline all derive from one ordered
//!   operation list, so they cannot drift apart.
//! - **Idempotent transforms**: concurrent misses may compute twice and
//!   race the store; both results are byte-equivalent, so last-writer-wins
//!   is safe.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`mask`] | Pure rounded-rectangle geometry, called once per output pixel |
//! | [`raster`] | Static path: decode, Lanczos3 resize, corner mask, JPEG/PNG encode |
//! | [`animated`] | Animated path: GIF model, disposal-aware compositor, palette quantization |
//! | [`cache`] | Content-addressed TTL cache of transform outputs |
//! | [`validator`] | Deterministic ETag derivation from identity + modifiers |
//! | [`engine`] | Facade wiring validation, cache, and transforms together |
//! | [`params`] | Transform request vocabulary and the canonical operation list |
//! | [`placeholder`] | Synthesized fallback avatar/banner images |
//! | [`error`] | Error taxonomy shared by every path |
//!
//! # Design Decisions
//!
//! ## Composited Masking for Animations
//!
//! Rounding an animated GIF frame-by-frame on the raw deltas corrupts every
//! frame after the first: deltas are partial updates whose meaning depends
//! on earlier frames and their disposal modes. The animated path replays
//! the animation through a compositor canvas, masks the state a viewer
//! actually sees, and stores each masked snapshot as a full-canvas frame
//! with disposal `None`. See [`animated`] for the details.
//!
//! ## Direct GIF Codec Access
//!
//! The static path uses the `image` crate end to end, but the animated path
//! speaks to the `gif` crate (the codec `image` wraps) directly: the
//! high-level frame API drops disposal modes and per-frame palette control,
//! and both are load-bearing here — a reserved transparency index must
//! exist in every output frame's palette.
//!
//! ## Injected Cache, Not a Global
//!
//! The cache is the engine's only shared mutable state and lives in an
//! [`engine::Engine`] instance. Tests construct isolated engines; embedders
//! choose the TTL once at construction.

pub mod animated;
pub mod cache;
pub mod engine;
pub mod error;
pub mod mask;
pub mod params;
pub mod placeholder;
pub mod raster;
pub mod validator;

pub use cache::{CachedImage, TransformCache, TransformKey};
pub use engine::{Engine, TransformOutput};
pub use error::EngineError;
pub use params::{Dimensions, Operation, TransformOptions};
pub use validator::derive_validator;
