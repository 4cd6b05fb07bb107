//! Driving port for itinerary enrichment.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::geocoding::{EnrichedItinerary, Itinerary};

/// Attach coordinates, ratings, and photos to itinerary activities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItineraryEnrichment: Send + Sync {
    /// Enrich every activity that can be matched. Unmatched activities are
    /// returned unchanged.
    async fn enrich(&self, itinerary: Itinerary) -> Result<EnrichedItinerary, Error>;
}
