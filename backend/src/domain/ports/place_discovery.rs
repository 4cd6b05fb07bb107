//! Driving port for place discovery.

use async_trait::async_trait;

use crate::domain::discovery::{ExplorePage, NearbyPage, NearbyQuery};
use crate::domain::{Error, ExploreQuery};

/// Read-side discovery operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceDiscovery: Send + Sync {
    /// Ranked, paginated places from every source in the query's scope.
    async fn explore(&self, query: ExploreQuery) -> Result<ExplorePage, Error>;

    /// Priority and live places around a point, nearest first.
    async fn nearby(&self, query: NearbyQuery) -> Result<NearbyPage, Error>;
}
