//! Driven port for the process-wide TTL caches.
//!
//! Entries are opaque strings; typed access lives in
//! [`crate::domain::JsonCache`]. Writes replace whole entries and a read past
//! expiry is a miss.

use std::time::Duration;

use async_trait::async_trait;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by cache backends.
    pub enum TtlCacheError {
        /// Backend is unavailable or timed out.
        Backend { message: String } => "cache backend failure: {message}",
    }
}

/// Key-value store with per-entry expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TtlCache: Send + Sync {
    /// Read a live entry.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, TtlCacheError>;

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    async fn put(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), TtlCacheError>;
}

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTtlCache;

#[async_trait]
impl TtlCache for NoOpTtlCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>, TtlCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &CacheKey,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), TtlCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn no_op_cache_always_misses() {
        let cache = NoOpTtlCache;
        let key = CacheKey::new("explore:v1:abc").expect("valid key");
        cache
            .put(&key, "{}".to_owned(), Duration::from_secs(60))
            .await
            .expect("put succeeds");
        assert_eq!(cache.get(&key).await.expect("get succeeds"), None);
    }
}
