//! libSQL cache backend — a single `cache_entries` table with per-row
//! expiry timestamps.
//!
//! Expired rows are treated as absent on read and deleted lazily. Runtime
//! query failures degrade to a miss / no-op with a warning, keeping the
//! `Cache` contract infallible.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, params};
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::error::CacheError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS cache_entries (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    expires_at INTEGER NOT NULL
)";

/// libSQL cache backend.
///
/// Holds a single connection reused for all operations; `libsql::Connection`
/// is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlCache {
    conn: Connection,
}

impl LibSqlCache {
    /// Open (or create) a local cache database file.
    pub async fn new_local(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CacheError::Open(format!("Failed to create cache directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to open cache database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| CacheError::Open(format!("Failed to create connection: {e}")))?;

        let cache = Self { conn };
        cache.init_schema().await?;
        info!(path = %path.display(), "Cache store opened");
        Ok(cache)
    }

    /// Create an in-memory cache (for tests).
    pub async fn new_memory() -> Result<Self, CacheError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to create in-memory cache: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| CacheError::Open(format!("Failed to create connection: {e}")))?;

        let cache = Self { conn };
        cache.init_schema().await?;
        Ok(cache)
    }

    async fn init_schema(&self) -> Result<(), CacheError> {
        self.conn
            .execute(SCHEMA, ())
            .await
            .map_err(|e| CacheError::Open(format!("Failed to create schema: {e}")))?;
        Ok(())
    }

    async fn try_get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut rows = self
            .conn
            .query(
                "SELECT value, expires_at FROM cache_entries WHERE key = ?1",
                params![key],
            )
            .await
            .map_err(|e| CacheError::Query(e.to_string()))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| CacheError::Query(e.to_string()))?
        else {
            return Ok(None);
        };

        let value: String = row.get(0).map_err(|e| CacheError::Query(e.to_string()))?;
        let expires_at: i64 = row.get(1).map_err(|e| CacheError::Query(e.to_string()))?;

        if expires_at <= Utc::now().timestamp() {
            // Lazy expiry — best effort, a failed delete just means the row
            // gets swept on a later read.
            let _ = self
                .conn
                .execute("DELETE FROM cache_entries WHERE key = ?1", params![key])
                .await;
            return Ok(None);
        }

        Ok(Some(value))
    }

    async fn try_set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)",
                params![key, value, expires_at],
            )
            .await
            .map_err(|e| CacheError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Cache for LibSqlCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(hit) => {
                debug!(key, hit = hit.is_some(), "Cache probe");
                hit
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        if let Err(e) = self.try_set(key, value, ttl).await {
            warn!(key, error = %e, "Cache write failed, continuing uncached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CACHE_TTL;

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        cache.set("email:abc", r#"{"id":"abc"}"#, CACHE_TTL).await;
        assert_eq!(
            cache.get("email:abc").await.as_deref(),
            Some(r#"{"id":"abc"}"#)
        );
    }

    #[tokio::test]
    async fn missing_key_misses() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        assert_eq!(cache.get("email:nope").await, None);
    }

    #[tokio::test]
    async fn reset_overwrites() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        cache.set("k", "first", CACHE_TTL).await;
        cache.set("k", "second", CACHE_TTL).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn expired_entry_is_absent() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        cache.set("k", "v", Duration::ZERO).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn namespaces_are_independent_keys() {
        let cache = LibSqlCache::new_memory().await.unwrap();
        cache.set("email:1", "message", CACHE_TTL).await;
        cache.set("analysis:1", "analysis", CACHE_TTL).await;
        assert_eq!(cache.get("email:1").await.as_deref(), Some("message"));
        assert_eq!(cache.get("analysis:1").await.as_deref(), Some("analysis"));
    }

    #[tokio::test]
    async fn file_backed_cache_persists_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        {
            let cache = LibSqlCache::new_local(&path).await.unwrap();
            cache.set("k", "v", CACHE_TTL).await;
        }
        let cache = LibSqlCache::new_local(&path).await.unwrap();
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    }
}
