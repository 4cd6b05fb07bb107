//! Federated place discovery.
//!
//! A request fans out to the curated, partner, and live sources, then runs
//! through explicit stages: [`aggregate`], [`deduplicate`], [`rank`] (or
//! [`shuffle_seeded`]), [`filter_by_distance`], and pagination. Each stage is
//! a plain function over a sequence; [`DiscoveryService`] wires them together
//! behind the result cache.

mod aggregate;
mod dedup;
mod nearby;
mod page;
mod rank;
mod service;

pub use aggregate::{Aggregate, SourceCounts, SourceOutcome, aggregate};
pub use dedup::{
    DEFAULT_PROXIMITY_TOLERANCE_M, NameProximitySimilarity, PlaceSimilarity, deduplicate,
};
pub use nearby::{
    DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_M, MAX_NEARBY_LIMIT, PRIORITY_SHARE_PERCENT,
    split_budget,
};
pub use page::{ExploreFilters, ExplorePage, NearbyPage, NearbyQuery, PlaceWithDistance};
pub use rank::{distance_from, filter_by_distance, rank, sampling_seed, shuffle_seeded};
pub use service::{DiscoveryConfig, DiscoveryService, DiscoverySources};
