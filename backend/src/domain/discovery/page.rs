//! Response shapes produced by the discovery service.

use pagination::PageInfo;
use serde::{Deserialize, Serialize};

use super::SourceCounts;
use crate::domain::{
    Coordinates, ExploreQuery, PlaceCategory, PlaceRecord, SortMode, SourceScope,
};

/// Normalised filters echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreFilters {
    /// City filter.
    pub city: Option<String>,
    /// Category filter.
    pub category: Option<PlaceCategory>,
    /// Free-text filter.
    #[serde(rename = "q")]
    pub text: Option<String>,
    /// Minimum rating after clamping.
    pub min_rating: Option<f64>,
    /// Ordering actually applied.
    pub sort: SortMode,
    /// User latitude.
    pub lat: Option<f64>,
    /// User longitude.
    pub lng: Option<f64>,
    /// Sources consulted.
    pub source: SourceScope,
    /// Distance radius in kilometres, when active.
    pub max_distance: Option<f64>,
    /// Whether random sampling was applied.
    pub random: bool,
    /// Whether a distance sort was downgraded for lack of a location.
    pub sort_downgraded: bool,
}

impl From<&ExploreQuery> for ExploreFilters {
    fn from(query: &ExploreQuery) -> Self {
        Self {
            city: query.city.clone(),
            category: query.category,
            text: query.text.clone(),
            min_rating: query.min_rating,
            sort: query.sort,
            lat: query.user_location.map(|c| c.latitude()),
            lng: query.user_location.map(|c| c.longitude()),
            source: query.scope,
            max_distance: query.max_distance_km,
            random: query.random,
            sort_downgraded: query.sort_downgraded,
        }
    }
}

/// One page of discovery results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorePage {
    /// Ranked, de-duplicated records on this page.
    pub items: Vec<PlaceRecord>,
    /// Pagination metadata for the full result set.
    pub pagination: PageInfo,
    /// Echo of the normalised query.
    pub filters: ExploreFilters,
    /// Per-source totals before de-duplication.
    pub counts: SourceCounts,
    /// Whether the page was served from the result cache.
    pub cached: bool,
}

/// Proximity request for the nearby surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    /// Search centre.
    pub location: Coordinates,
    /// Search radius in metres.
    pub radius_m: u32,
    /// Category filter.
    pub category: Option<PlaceCategory>,
    /// Maximum number of results.
    pub limit: usize,
}

/// Record annotated with its distance from the search centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceWithDistance {
    /// The place.
    #[serde(flatten)]
    pub place: PlaceRecord,
    /// Great-circle distance from the search centre, in kilometres.
    pub distance_km: f64,
}

/// Nearby results ordered by distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPage {
    /// Results, nearest first.
    pub items: Vec<PlaceWithDistance>,
    /// Per-source totals before de-duplication.
    pub counts: SourceCounts,
}
