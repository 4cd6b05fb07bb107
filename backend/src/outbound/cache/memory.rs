//! Process-local TTL cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{CacheKey, TtlCache, TtlCacheError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// TTL cache held in a process-wide map.
///
/// Expiry is evaluated against the injected clock on every read; expired
/// entries are misses and are evicted on the spot. Every write also sweeps
/// expired entries, so keys that are never read again do not accumulate.
pub struct InMemoryTtlCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTtlCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until the next sweep.
    pub fn len(&self) -> Result<usize, TtlCacheError> {
        Ok(self.read()?.len())
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> Result<bool, TtlCacheError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Entry>>, TtlCacheError> {
        self.entries
            .read()
            .map_err(|_| TtlCacheError::backend("in-memory cache lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Entry>>, TtlCacheError> {
        self.entries
            .write()
            .map_err(|_| TtlCacheError::backend("in-memory cache lock poisoned"))
    }
}

#[async_trait]
impl TtlCache for InMemoryTtlCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, TtlCacheError> {
        let now = self.clock.utc();
        match self.read()?.get(key.as_str()) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }
        let mut entries = self.write()?;
        // Another writer may have refreshed the entry between the locks.
        if entries
            .get(key.as_str())
            .is_some_and(|entry| entry.expires_at <= now)
        {
            entries.remove(key.as_str());
            debug!(key = %key, "evicted expired cache entry");
        }
        Ok(None)
    }

    async fn put(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), TtlCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| TtlCacheError::backend(format!("ttl out of range: {err}")))?;
        let now = self.clock.utc();
        let mut entries = self.write()?;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let swept = before - entries.len();
        if swept > 0 {
            debug!(swept, "swept expired cache entries");
        }
        entries.insert(
            key.as_str().to_owned(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
