//! Typed view over a [`TtlCache`] backend.
//!
//! Backend failures and undecodable entries both read as misses, so a broken
//! cache degrades to recomputation rather than failing requests.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ports::{CacheKey, TtlCache};

/// JSON-encoded values stored in a shared TTL cache.
pub struct JsonCache<T> {
    backend: Arc<dyn TtlCache>,
    ttl: Duration,
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCache<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            ttl: self.ttl,
            name: self.name,
            _value: PhantomData,
        }
    }
}

impl<T> JsonCache<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Wrap `backend`, storing entries for `ttl`. `name` labels log events.
    pub fn new(backend: Arc<dyn TtlCache>, ttl: Duration, name: &'static str) -> Self {
        Self {
            backend,
            ttl,
            name,
            _value: PhantomData,
        }
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read and decode an entry.
    pub async fn get(&self, key: &CacheKey) -> Option<T> {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(cache = self.name, %key, "cache miss");
                return None;
            }
            Err(error) => {
                warn!(cache = self.name, %key, %error, "cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(cache = self.name, %key, "cache hit");
                Some(value)
            }
            Err(error) => {
                warn!(cache = self.name, %key, %error, "corrupt cache entry; treating as miss");
                None
            }
        }
    }

    /// Encode and store `value`, replacing any previous entry.
    pub async fn put(&self, key: &CacheKey, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(cache = self.name, %key, %error, "cache entry not encodable; skipping write");
                return;
            }
        };
        if let Err(error) = self.backend.put(key, encoded, self.ttl).await {
            warn!(cache = self.name, %key, %error, "cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockTtlCache, TtlCacheError};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
    }

    fn key() -> CacheKey {
        CacheKey::new("geocode:v1:abc").expect("valid key")
    }

    fn cache_with(mock: MockTtlCache) -> JsonCache<Entry> {
        JsonCache::new(Arc::new(mock), Duration::from_secs(30), "test")
    }

    #[rstest]
    #[tokio::test]
    async fn decodes_stored_entries() {
        let mut mock = MockTtlCache::new();
        mock.expect_get()
            .returning(|_| Ok(Some(r#"{"name":"Bà Nà"}"#.to_owned())));
        let value = cache_with(mock).get(&key()).await;
        assert_eq!(
            value,
            Some(Entry {
                name: "Bà Nà".to_owned()
            })
        );
    }

    #[rstest]
    #[case(Ok(Some("not json".to_owned())))]
    #[case(Ok(Some(r#"{"unexpected":1}"#.to_owned())))]
    #[case(Err(TtlCacheError::backend("connection refused")))]
    #[case(Ok(None))]
    #[tokio::test]
    async fn failures_read_as_misses(#[case] stored: Result<Option<String>, TtlCacheError>) {
        let mut mock = MockTtlCache::new();
        mock.expect_get().return_once(move |_| stored);
        assert_eq!(cache_with(mock).get(&key()).await, None);
    }

    #[rstest]
    #[tokio::test]
    async fn put_writes_json_with_configured_ttl() {
        let mut mock = MockTtlCache::new();
        mock.expect_put()
            .with(
                eq(key()),
                eq(r#"{"name":"Hội An"}"#.to_owned()),
                eq(Duration::from_secs(30)),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));
        cache_with(mock)
            .put(
                &key(),
                &Entry {
                    name: "Hội An".to_owned(),
                },
            )
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn put_swallows_backend_errors() {
        let mut mock = MockTtlCache::new();
        mock.expect_put()
            .returning(|_, _, _| Err(TtlCacheError::backend("readonly")));
        cache_with(mock)
            .put(
                &key(),
                &Entry {
                    name: "Huế".to_owned(),
                },
            )
            .await;
    }
}
