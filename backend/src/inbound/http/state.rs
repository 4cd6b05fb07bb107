//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ItineraryEnrichment, PlaceDiscovery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Explore and nearby discovery.
    pub discovery: Arc<dyn PlaceDiscovery>,
    /// Itinerary geocoding and enrichment.
    pub enrichment: Arc<dyn ItineraryEnrichment>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        discovery: Arc<dyn PlaceDiscovery>,
        enrichment: Arc<dyn ItineraryEnrichment>,
    ) -> Self {
        Self {
            discovery,
            enrichment,
        }
    }
}
