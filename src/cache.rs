//! In-memory transform cache.
//!
//! Transform compute time (decode → resample → quantize → encode) dominates
//! every other cost in the engine, so outputs are memoized. This module
//! lets repeated requests for the same source bytes and parameters skip the
//! whole pipeline.
//!
//! # Design
//!
//! The cache is **content-addressed**: keys are derived from a SHA-256 of
//! the source bytes plus the ordered operation parameters, never from
//! usernames or storage paths. Two requests with byte-identical sources and
//! identical parameter lists always collide on the same entry; a new upload
//! produces new bytes and therefore new keys, which is why
//! [`TransformCache::invalidate_all`] can be a full clear — the old entries
//! are unreachable anyway, and a clear guarantees no torn state during the
//! swap.
//!
//! ## Keys
//!
//! [`TransformKey::derive`] hashes the source bytes followed by each
//! operation under a domain-separated label (`resize\0`, `round\0`) with
//! little-endian parameter bytes. Order is significant: the engine fixes
//! resize-before-round, so `resize:128 + round:16` and `round:16 +
//! resize:128` could never alias even if a caller constructed both.
//!
//! ## Lifecycle
//!
//! Entries expire after a TTL fixed when the cache is constructed. Expiry is
//! lazy: an expired entry is a miss on [`get`](TransformCache::get) and is
//! physically removed on the next [`put`](TransformCache::put), not by a
//! background sweeper. There is no persistence — the cache is rebuilt empty
//! on restart, which is fine because it is a performance optimization only;
//! canonical image bytes live in durable storage owned by the boundary.
//!
//! ## Concurrency
//!
//! One `RwLock` guards the whole map: lookups take the read lock, inserts
//! and clears the write lock, each held only for the map access itself.
//! Coarse but correct; see the crate docs for why single-flight collapsing
//! of concurrent misses is deliberately not attempted.

use crate::params::Operation;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Default entry lifetime, one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache key: SHA-256 over source bytes and ordered operation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformKey(String);

impl TransformKey {
    /// Derive the key for transforming `source` with `ops` (in order).
    pub fn derive(source: &[u8], ops: &[Operation]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source);
        for op in ops {
            match op {
                Operation::Resize(dims) => {
                    hasher.update(b"resize\0");
                    hasher.update(dims.width.to_le_bytes());
                    hasher.update(dims.height.to_le_bytes());
                }
                Operation::Round(radius) => {
                    hasher.update(b"round\0");
                    hasher.update(radius.to_le_bytes());
                }
            }
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// SHA-256 hash of a byte slice, returned as a hex string.
///
/// Used for key derivation and as the source-identity sentinel for
/// placeholder images (which have no storage-layer identity of their own).
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A single cached transform output.
///
/// The payload is `Arc`-shared: lookups hand out cheap clones and the cache
/// retains ownership, so callers get a read-only view and can never mutate
/// an entry in place.
#[derive(Debug, Clone)]
pub struct CachedImage {
    data: Arc<[u8]>,
    content_type: String,
    created: Instant,
}

impl CachedImage {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            created: Instant::now(),
        }
    }

    pub fn data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    fn expired(&self, ttl: Duration) -> bool {
        self.created.elapsed() >= ttl
    }
}

/// Concurrent TTL-bounded memo of transform outputs.
#[derive(Debug)]
pub struct TransformCache {
    ttl: Duration,
    entries: RwLock<HashMap<TransformKey, CachedImage>>,
}

impl TransformCache {
    /// Create a cache with the [`DEFAULT_TTL`].
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache whose entries expire after `ttl`. The TTL is fixed
    /// for the life of the cache.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a cached output. An entry past its TTL is a miss even while
    /// still physically present.
    pub fn get(&self, key: &TransformKey) -> Option<CachedImage> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| !entry.expired(self.ttl))
            .cloned()
    }

    /// Store an output, overwriting any previous entry for the key. Last
    /// writer wins: identical keys imply identical semantic content by
    /// construction, so an overwrite only ever replaces equivalent bytes.
    ///
    /// Expired entries are pruned here, on write contention, rather than by
    /// a background sweep.
    pub fn put(&self, key: TransformKey, entry: CachedImage) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, existing| !existing.expired(self.ttl));
        entries.insert(key, entry);
    }

    /// Drop every entry. Called when a user replaces their source image so
    /// stale transforms of the old bytes never leak into later responses.
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    /// Number of physically present entries, including not-yet-pruned
    /// expired ones.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new()
    }
}
