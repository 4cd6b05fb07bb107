//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::DefaultClock;
use waypoint::domain::ports::TtlCache;
use waypoint::outbound::cache::InMemoryTtlCache;
use waypoint::outbound::persistence::DbPool;
use waypoint::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: AppSettings,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) cache: Arc<dyn TtlCache>,
}

impl ServerConfig {
    /// Configuration with fixture sources and an in-process cache.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, settings: AppSettings) -> Self {
        Self {
            bind_addr,
            settings,
            db_pool: None,
            cache: Arc::new(InMemoryTtlCache::new(Arc::new(DefaultClock))),
        }
    }

    /// Attach a database connection pool for the curated and partner stores.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the in-process cache, e.g. with a shared Redis cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn TtlCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
