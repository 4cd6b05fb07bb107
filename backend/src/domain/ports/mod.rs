//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod geocode_provider;
mod itinerary_enrichment;
mod place_discovery;
mod place_source;
mod ttl_cache;

pub use cache_key::{CacheKey, CacheKeyValidationError, EXPLORE_NAMESPACE, GEOCODE_NAMESPACE};
#[cfg(test)]
pub use geocode_provider::MockGeocodeProvider;
pub use geocode_provider::{
    FixtureGeocodeProvider, GeocodeHit, GeocodeProvider, GeocodeProviderError, NearbyPlace,
    NearbySearchRequest, PlaceDetails,
};
#[cfg(test)]
pub use itinerary_enrichment::MockItineraryEnrichment;
pub use itinerary_enrichment::ItineraryEnrichment;
#[cfg(test)]
pub use place_discovery::MockPlaceDiscovery;
pub use place_discovery::PlaceDiscovery;
#[cfg(test)]
pub use place_source::MockPlaceSource;
pub use place_source::{
    FixturePlaceSource, PlaceSource, PlaceSourceError, PlaceSourceQuery, SourcePage,
};
#[cfg(test)]
pub use ttl_cache::MockTtlCache;
pub use ttl_cache::{NoOpTtlCache, TtlCache, TtlCacheError};
