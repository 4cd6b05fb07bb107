//! Itinerary enrichment: batch geocoding followed by the fuzzy join.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{EnrichmentSummary, GeocodeQuery, GeocodeResolver, Itinerary, PlaceEnricher};
use crate::domain::Error;
use crate::domain::ports::ItineraryEnrichment;

/// Itinerary with enrichment applied, plus counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItinerary {
    /// The itinerary, activities annotated where a match was found.
    pub itinerary: Itinerary,
    /// Pass statistics.
    pub summary: EnrichmentSummary,
}

/// Domain service implementing [`ItineraryEnrichment`].
#[derive(Clone)]
pub struct ItineraryEnrichmentService {
    resolver: GeocodeResolver,
    enricher: PlaceEnricher,
}

impl ItineraryEnrichmentService {
    /// Create the service.
    pub fn new(resolver: GeocodeResolver, enricher: PlaceEnricher) -> Self {
        Self { resolver, enricher }
    }
}

#[async_trait]
impl ItineraryEnrichment for ItineraryEnrichmentService {
    async fn enrich(&self, mut itinerary: Itinerary) -> Result<EnrichedItinerary, Error> {
        let destination = itinerary.destination.clone();
        let queries: Vec<GeocodeQuery> = itinerary
            .distinct_locations()
            .into_iter()
            .map(|location| GeocodeQuery::new(location, destination.as_deref()))
            .collect();
        let candidates = self.resolver.resolve_many(&queries).await;
        let resolved = candidates
            .iter()
            .filter(|candidate| candidate.is_resolved())
            .count();
        let (matched_activities, unmatched_activities) =
            self.enricher.enrich(&mut itinerary, &candidates);
        let summary = EnrichmentSummary {
            locations: queries.len(),
            resolved,
            matched_activities,
            unmatched_activities,
        };
        info!(
            locations = summary.locations,
            resolved = summary.resolved,
            matched = summary.matched_activities,
            unmatched = summary.unmatched_activities,
            "itinerary enriched"
        );
        Ok(EnrichedItinerary { itinerary, summary })
    }
}
