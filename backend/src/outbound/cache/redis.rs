//! Redis-backed TTL cache shared between replicas.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use rand::Rng;
use tracing::debug;

use crate::domain::ports::{CacheKey, TtlCache, TtlCacheError};

/// Upper bound on the random extension added to every TTL, in percent.
const TTL_JITTER_PERCENT: u64 = 10;

/// Build a connection pool for `redis_url`.
///
/// # Errors
///
/// Returns [`TtlCacheError::Backend`] when the URL is invalid or the initial
/// connection cannot be established.
pub async fn connect_redis_pool(
    redis_url: &str,
    max_size: u32,
) -> Result<Pool<RedisConnectionManager>, TtlCacheError> {
    let manager = RedisConnectionManager::new(redis_url)
        .map_err(|err| TtlCacheError::backend(format!("invalid redis url: {err}")))?;
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .await
        .map_err(|err| TtlCacheError::backend(format!("redis pool build failed: {err}")))
}

/// TTL cache stored in Redis with `SET .. EX`.
///
/// A small random extension is added to each TTL so that entries written
/// together do not all expire in the same second.
#[derive(Clone)]
pub struct RedisTtlCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisTtlCache {
    /// Wrap an existing pool.
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TtlCache for RedisTtlCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, TtlCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TtlCacheError::backend(format!("redis checkout failed: {err}")))?;
        conn.get(key.as_str())
            .await
            .map_err(|err| TtlCacheError::backend(format!("redis GET failed: {err}")))
    }

    async fn put(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), TtlCacheError> {
        let seconds = jittered_seconds(ttl, rand::thread_rng().gen_range(0..=TTL_JITTER_PERCENT));
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TtlCacheError::backend(format!("redis checkout failed: {err}")))?;
        conn.set_ex::<_, _, ()>(key.as_str(), value, seconds)
            .await
            .map_err(|err| TtlCacheError::backend(format!("redis SET failed: {err}")))?;
        debug!(key = %key, ttl_secs = seconds, "stored cache entry");
        Ok(())
    }
}

/// Whole-second TTL extended by `jitter_percent`, never below one second.
fn jittered_seconds(ttl: Duration, jitter_percent: u64) -> u64 {
    let base = ttl.as_secs().max(1);
    let extra = base.saturating_mul(jitter_percent) / 100;
    base.saturating_add(extra)
}
