//! The engine facade: validation, cache, and transform wiring.
//!
//! Control flow for a request, as seen from the boundary handler:
//!
//! ```text
//! 1. validator(identity, opts)      cheap; lets the handler answer
//!                                   "not modified" without decoding
//! 2. transform(source, opts)       cache lookup → on miss, run the
//!                                   pipeline → cache store → bytes
//! 3. invalidate_all()              on upload, before storing new bytes
//! ```
//!
//! The engine holds the only cross-request shared state, the
//! [`TransformCache`]. It is an injected instance rather than a process
//! global so tests (and multi-tenant embedders) construct isolated engines.
//!
//! Two concurrent misses on the same key may both compute and race the
//! store; whichever `put` lands last wins. That is wasted work, not
//! incorrectness — identical keys produce semantically identical entries,
//! and both callers get a correct result. Collapsing the duplicate compute
//! would buy throughput at the cost of a per-key wait channel; transform
//! idempotence makes the simple design safe.

use crate::animated;
use crate::cache::{CachedImage, TransformCache, TransformKey};
use crate::error::EngineError;
use crate::params::{Dimensions, Operation, TransformOptions};
use crate::raster;
use crate::validator;
use image::ImageFormat;
use std::sync::Arc;
use std::time::Duration;

/// Canonical stored size for normalized uploads.
const UPLOAD_SIZE: u32 = 256;

/// A transform result handed back to the boundary.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub data: Arc<[u8]>,
    pub content_type: String,
}

impl From<CachedImage> for TransformOutput {
    fn from(entry: CachedImage) -> Self {
        Self {
            data: entry.data(),
            content_type: entry.content_type().to_string(),
        }
    }
}

/// Image transform engine with a TTL-bounded output cache.
pub struct Engine {
    cache: TransformCache,
}

impl Engine {
    /// Engine with the default cache TTL.
    pub fn new() -> Self {
        Self {
            cache: TransformCache::new(),
        }
    }

    /// Engine whose cached outputs expire after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: TransformCache::with_ttl(ttl),
        }
    }

    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    /// Drop every cached transform. Call when the underlying source image
    /// for any identity is replaced.
    pub fn invalidate_all(&self) {
        log::debug!("invalidating transform cache");
        self.cache.invalidate_all();
    }

    /// The validator (ETag) the given request would produce, without
    /// running the transform. O(1); safe to call before every response.
    pub fn validator(&self, source_identity: &str, opts: &TransformOptions) -> String {
        validator::validator_for(source_identity, opts)
    }

    /// Transform `source`, dispatching on its sniffed format: GIF bytes go
    /// through the animated pipeline, everything else through the static
    /// one.
    pub fn transform(
        &self,
        source: &[u8],
        opts: &TransformOptions,
    ) -> Result<TransformOutput, EngineError> {
        if sniff_format(source) == Some(ImageFormat::Gif) {
            self.transform_animated(source, opts)
        } else {
            self.transform_static(source, opts)
        }
    }

    /// Resize/round a static image, memoized by content and parameters.
    pub fn transform_static(
        &self,
        source: &[u8],
        opts: &TransformOptions,
    ) -> Result<TransformOutput, EngineError> {
        let ops = opts.operations();
        if ops.is_empty() {
            return passthrough(source);
        }

        self.cached(source, &ops, || {
            let encoded = raster::transform_static(source, opts)?;
            Ok((encoded.data, encoded.content_type.to_string()))
        })
    }

    /// Resize/round an animated GIF, memoized by content and parameters.
    /// Operations apply in the canonical order: resize, then rounding.
    pub fn transform_animated(
        &self,
        source: &[u8],
        opts: &TransformOptions,
    ) -> Result<TransformOutput, EngineError> {
        let ops = opts.operations();
        if ops.is_empty() {
            return passthrough(source);
        }

        self.cached(source, &ops, || {
            let mut animation = animated::decode_animation(source)?;
            for op in &ops {
                animation = match op {
                    Operation::Resize(target) => animated::resize_animation(&animation, *target)?,
                    Operation::Round(radius) => animated::round_animation(&animation, *radius)?,
                };
            }
            let data = animated::encode_animation(&animation)?;
            Ok((data, "image/gif".to_string()))
        })
    }

    /// Normalize an upload to its canonical stored form: GIFs are resized
    /// to the canonical square as GIF, everything else is resized and
    /// re-encoded as JPEG. Not memoized — each upload is seen once.
    pub fn normalize_upload(&self, source: &[u8]) -> Result<TransformOutput, EngineError> {
        let target = Dimensions::square(UPLOAD_SIZE);
        if sniff_format(source) == Some(ImageFormat::Gif) {
            let animation = animated::decode_animation(source)?;
            let resized = animated::resize_animation(&animation, target)?;
            let data = animated::encode_animation(&resized)?;
            return Ok(TransformOutput {
                data: data.into(),
                content_type: "image/gif".to_string(),
            });
        }

        let raster = raster::decode(source)?;
        let resized = raster::resize(raster, target);
        // Stored static avatars are always JPEG regardless of input format.
        let encoded = raster::encode(&raster::Raster {
            format: raster::RasterFormat::Jpeg,
            ..resized
        })?;
        Ok(TransformOutput {
            data: encoded.data.into(),
            content_type: encoded.content_type.to_string(),
        })
    }

    /// Cache-or-compute. The entry is stored before the result is returned
    /// and shares its payload with it, so a subsequent identical request is
    /// served from the same allocation.
    fn cached(
        &self,
        source: &[u8],
        ops: &[Operation],
        compute: impl FnOnce() -> Result<(Vec<u8>, String), EngineError>,
    ) -> Result<TransformOutput, EngineError> {
        let key = TransformKey::derive(source, ops);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("transform cache hit for {}", key.as_str());
            return Ok(hit.into());
        }

        log::debug!("transform cache miss for {}", key.as_str());
        let (data, content_type) = compute()?;
        let entry = CachedImage::new(data, content_type);
        self.cache.put(key, entry.clone());
        Ok(entry.into())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn sniff_format(source: &[u8]) -> Option<ImageFormat> {
    image::guess_format(source).ok()
}

/// No operations requested: hand the source back untouched with its
/// sniffed content type. Unrecognized bytes are a decode failure — the
/// engine never serves bytes it cannot name.
fn passthrough(source: &[u8]) -> Result<TransformOutput, EngineError> {
    let content_type = match sniff_format(source) {
        Some(ImageFormat::Jpeg) => "image/jpeg",
        Some(ImageFormat::Png) => "image/png",
        Some(ImageFormat::Gif) => "image/gif",
        Some(other) => other.to_mime_type(),
        None => {
            return Err(EngineError::Decode(
                "unrecognized image format".to_string(),
            ));
        }
    };
    Ok(TransformOutput {
        data: source.to_vec().into(),
        content_type: content_type.to_string(),
    })
}
