//! Driven port for the external maps provider.
//!
//! The provider answers three kinds of call: forward geocoding of a free-text
//! address, proximity search around a coordinate, and extended details for a
//! known place identifier. Both the geocode resolver and the live place
//! source sit on top of it.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{Coordinates, PlaceCategory, Photo, Rating};

/// Best forward-geocoding match for an address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    /// Resolved location.
    pub coordinates: Coordinates,
    /// Provider identifier of the matched place.
    pub place_id: Option<String>,
    /// Provider's canonical address.
    pub formatted_address: Option<String>,
}

/// Proximity search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    /// Centre of the search circle.
    pub center: Coordinates,
    /// Circle radius in metres.
    pub radius_m: u32,
    /// Keyword the provider should match.
    pub keyword: Option<String>,
    /// Restrict results to one category.
    pub category: Option<PlaceCategory>,
}

/// One proximity-search result.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlace {
    /// Provider identifier.
    pub place_id: String,
    /// Display name.
    pub name: String,
    /// Vicinity or street address.
    pub address: Option<String>,
    /// Location, if reported.
    pub coordinates: Option<Coordinates>,
    /// Rating summary, if reported.
    pub rating: Option<Rating>,
    /// Photos in provider order.
    pub photos: Vec<Photo>,
    /// Category mapped from the provider's type list.
    pub category: PlaceCategory,
    /// Provider payload, kept for enrichment fallbacks.
    pub raw: Value,
}

/// Extended data for a known place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceDetails {
    /// Provider's canonical address.
    pub formatted_address: Option<String>,
    /// Rating summary, if reported.
    pub rating: Option<Rating>,
    /// Photos, capped by the adapter.
    pub photos: Vec<Photo>,
}

define_port_error! {
    /// Errors surfaced while calling the maps provider.
    pub enum GeocodeProviderError {
        /// Network transport failed before a response arrived.
        Transport { message: String } => "maps provider transport failed: {message}",
        /// Call exceeded its timeout.
        Timeout { message: String } => "maps provider timeout: {message}",
        /// Provider throttled the request.
        RateLimited { message: String } => "maps provider rate limited request: {message}",
        /// Response could not be decoded.
        Decode { message: String } => "maps provider response decode failed: {message}",
        /// Provider or adapter rejected the request.
        InvalidRequest { message: String } => "maps provider request invalid: {message}",
    }
}

impl GeocodeProviderError {
    /// Whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for the maps provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Forward-geocode `address`. `Ok(None)` means no match.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeProviderError>;

    /// Search for places around a point.
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<NearbyPlace>, GeocodeProviderError>;

    /// Fetch extended details. `Ok(None)` means the provider has no record.
    async fn place_details(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceDetails>, GeocodeProviderError>;
}

/// Provider that never resolves anything.
///
/// Used when no maps API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureGeocodeProvider;

#[async_trait]
impl GeocodeProvider for FixtureGeocodeProvider {
    async fn geocode(&self, _address: &str) -> Result<Option<GeocodeHit>, GeocodeProviderError> {
        Ok(None)
    }

    async fn nearby_search(
        &self,
        _request: &NearbySearchRequest,
    ) -> Result<Vec<NearbyPlace>, GeocodeProviderError> {
        Ok(Vec::new())
    }

    async fn place_details(
        &self,
        _place_id: &str,
    ) -> Result<Option<PlaceDetails>, GeocodeProviderError> {
        Ok(None)
    }
}
