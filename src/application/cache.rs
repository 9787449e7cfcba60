//! Cache-aside snapshot policy for post reads.
//!
//! The cache never fails a request: lookups fall through to the relational store on any
//! error and writes are best-effort. Invalidation always deletes; snapshots are never
//! rewritten in place after a mutation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::PostRecord;

pub const METRIC_CACHE_HIT: &str = "scriven_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "scriven_cache_miss_total";
pub const METRIC_CACHE_ERROR: &str = "scriven_cache_error_total";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CacheError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Byte-oriented key-value store with per-entry expiry.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

/// Post snapshots keyed by `{prefix}{id}`.
#[derive(Clone)]
pub struct PostSnapshots {
    cache: Arc<dyn SnapshotCache>,
    key_prefix: String,
    ttl: Duration,
}

impl PostSnapshots {
    pub fn new(cache: Arc<dyn SnapshotCache>, key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            cache,
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    pub fn key(&self, id: i64) -> String {
        format!("{}{}", self.key_prefix, id)
    }

    /// Cached snapshot for `id`; errors and undecodable entries read as a miss.
    pub async fn load(&self, id: i64) -> Option<PostRecord> {
        let key = self.key(id);
        let bytes = match self.cache.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                counter!(METRIC_CACHE_MISS).increment(1);
                return None;
            }
            Err(err) => {
                counter!(METRIC_CACHE_ERROR).increment(1);
                warn!(
                    target = "scriven::cache",
                    key = %key,
                    error = %err,
                    "cache lookup failed; falling back to storage"
                );
                return None;
            }
        };

        match serde_json::from_slice::<PostRecord>(&bytes) {
            Ok(post) => {
                counter!(METRIC_CACHE_HIT).increment(1);
                Some(post)
            }
            Err(err) => {
                counter!(METRIC_CACHE_ERROR).increment(1);
                warn!(
                    target = "scriven::cache",
                    key = %key,
                    error = %err,
                    "cached snapshot could not be decoded"
                );
                None
            }
        }
    }

    pub async fn store(&self, post: &PostRecord) {
        let key = self.key(post.id);
        let result = match serde_json::to_vec(post) {
            Ok(bytes) => self.cache.set(&key, bytes, self.ttl).await,
            Err(err) => Err(CacheError::from(err)),
        };

        if let Err(err) = result {
            counter!(METRIC_CACHE_ERROR).increment(1);
            warn!(
                target = "scriven::cache",
                key = %key,
                error = %err,
                "failed to store post snapshot"
            );
        } else {
            debug!(target = "scriven::cache", key = %key, "post snapshot stored");
        }
    }

    pub async fn invalidate(&self, id: i64) {
        let key = self.key(id);
        if let Err(err) = self.cache.delete(&key).await {
            counter!(METRIC_CACHE_ERROR).increment(1);
            warn!(
                target = "scriven::cache",
                key = %key,
                error = %err,
                "failed to invalidate post snapshot"
            );
        }
    }
}
