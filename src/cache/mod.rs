//! Key/value cache with expiry, fronting raw messages and analyses.
//!
//! Availability is optional by contract: if the backing store is
//! unreachable, the pipeline runs against [`NullCache`] and behaves exactly
//! like a permanent cache miss. Cache failures are never surfaced.

pub mod libsql_backend;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

pub use libsql_backend::LibSqlCache;

/// Time-to-live for both cache namespaces: 8 hours.
pub const CACHE_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Backend-agnostic cache trait.
///
/// A present, non-expired entry is authoritative and bypasses all upstream
/// work. Values are immutable once set; a re-`set` overwrites. There is no
/// invalidation API beyond TTL expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a value. Absent, expired, and backend-failure all report
    /// `None`.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value with a TTL. Backend failures are swallowed.
    async fn set(&self, key: &str, value: &str, ttl: Duration);
}

/// Cache that holds nothing: every `get` misses, every `set` is a no-op.
pub struct NullCache;

#[async_trait]
impl Cache for NullCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) {}
}

/// Open the libSQL-backed cache, degrading to [`NullCache`] if the backing
/// store cannot be opened. Never fails.
pub async fn open_or_null(path: &Path) -> Arc<dyn Cache> {
    match LibSqlCache::new_local(path).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cache store unavailable, running uncached");
            Arc::new(NullCache)
        }
    }
}
