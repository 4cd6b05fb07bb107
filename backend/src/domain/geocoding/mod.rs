//! Geocode resolution and itinerary enrichment.

mod enricher;
mod itinerary;
mod reject_list;
mod resolver;

pub use enricher::{
    Activity, EnrichmentSummary, Itinerary, ItineraryDay, LocationMatcher, PlaceEnricher,
    SubstringLocationMatcher,
};
pub use itinerary::{EnrichedItinerary, ItineraryEnrichmentService};
pub use reject_list::{AddressRejectList, DEFAULT_REJECTED_ADDRESSES};
pub use resolver::{GeocodeConfig, GeocodeQuery, GeocodeResolver, GeocodeResult, GeocodeStrategy};
