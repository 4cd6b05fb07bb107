//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types
//! (camelCase field names) but live in the inbound adapter layer where
//! framework concerns belong.
#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// Every upstream dependency needed to answer failed.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "missing required field: lat")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level details, e.g. `{"field": "lat", "code": "missing_field"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Coordinates`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Coordinates)]
pub struct CoordinatesSchema {
    /// Latitude in degrees, `[-90, 90]`.
    #[schema(example = 10.346)]
    lat: f64,
    /// Longitude in degrees, `[-180, 180]`.
    #[schema(example = 107.084)]
    lng: f64,
}

/// OpenAPI schema for [`crate::domain::PlaceCategory`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PlaceCategory, rename_all = "snake_case")]
pub enum PlaceCategorySchema {
    Restaurant,
    Cafe,
    Hotel,
    Attraction,
    Shopping,
    Nightlife,
    Entertainment,
    Other,
}

/// OpenAPI schema for [`crate::domain::SourceKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SourceKind, rename_all = "snake_case")]
pub enum SourceKindSchema {
    /// Priority placement store.
    Partner,
    /// Curated catalogue.
    Curated,
    /// Live maps provider.
    Live,
}

/// OpenAPI schema for [`crate::domain::Rating`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Rating)]
pub struct RatingSchema {
    /// Mean score on a zero to five scale.
    #[schema(example = 4.6)]
    average: f64,
    /// Number of ratings.
    #[schema(example = 182)]
    count: u32,
}

/// OpenAPI schema for [`crate::domain::Photo`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Photo, rename_all = "camelCase")]
pub struct PhotoSchema {
    /// 200px rendition.
    small_url: String,
    /// 400px rendition.
    medium_url: String,
    /// 800px rendition.
    large_url: String,
}

/// OpenAPI schema for [`crate::domain::PlaceRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PlaceRecord, rename_all = "camelCase")]
pub struct PlaceSchema {
    /// Identifier within the originating source.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Maps-provider place identifier.
    provider_place_id: Option<String>,
    /// Display name.
    #[schema(example = "Gành Hào")]
    name: String,
    /// Street address or vicinity.
    address: String,
    /// City.
    #[schema(example = "Vũng Tàu")]
    city: Option<String>,
    /// Category.
    category: PlaceCategorySchema,
    /// Location.
    coordinates: Option<CoordinatesSchema>,
    /// Rating summary.
    rating: Option<RatingSchema>,
    /// Photos in display order.
    photos: Vec<PhotoSchema>,
    /// Free-form tags.
    tags: Vec<String>,
    /// Source the record was read from.
    source: SourceKindSchema,
    /// Whether the place has paid priority placement.
    is_partner: bool,
    /// Insertion time in the originating store (RFC 3339).
    created_at: Option<String>,
    /// Opaque source payload.
    raw: Option<serde_json::Value>,
}

/// OpenAPI schema for [`pagination::PageInfo`].
#[derive(ToSchema)]
#[schema(as = pagination::PageInfo, rename_all = "camelCase")]
pub struct PageInfoSchema {
    /// One-based page number.
    #[schema(example = 1)]
    page: u32,
    /// Page size.
    #[schema(example = 24)]
    limit: u32,
    /// Items across every page.
    total: usize,
    /// Non-empty pages.
    total_pages: usize,
    /// Whether a later page holds items.
    has_next_page: bool,
    /// Whether an earlier page exists.
    has_prev_page: bool,
}

/// OpenAPI schema for [`crate::domain::discovery::SourceCounts`].
#[derive(ToSchema)]
#[schema(as = crate::domain::discovery::SourceCounts)]
pub struct SourceCountsSchema {
    /// Curated catalogue total.
    places: usize,
    /// Partner store total.
    partners: usize,
    /// Live provider total.
    google: usize,
}

/// OpenAPI schema for [`crate::domain::discovery::ExploreFilters`].
#[derive(ToSchema)]
#[schema(as = crate::domain::discovery::ExploreFilters, rename_all = "camelCase")]
pub struct ExploreFiltersSchema {
    city: Option<String>,
    category: Option<PlaceCategorySchema>,
    q: Option<String>,
    min_rating: Option<f64>,
    /// Ordering actually applied.
    #[schema(example = "recent")]
    sort: String,
    lat: Option<f64>,
    lng: Option<f64>,
    /// Sources consulted.
    #[schema(example = "all")]
    source: String,
    /// Distance radius in kilometres, set whenever a location is present.
    max_distance: Option<f64>,
    random: bool,
    /// Set when `sort=distance` was requested without a location.
    sort_downgraded: bool,
}

/// OpenAPI schema for [`crate::domain::discovery::ExplorePage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::discovery::ExplorePage)]
pub struct ExploreResponseSchema {
    /// Places on this page.
    items: Vec<PlaceSchema>,
    /// Metadata for the full result set.
    pagination: PageInfoSchema,
    /// Normalised filters.
    filters: ExploreFiltersSchema,
    /// Per-source totals before de-duplication.
    counts: SourceCountsSchema,
    /// Whether the page came from the result cache.
    cached: bool,
}

/// OpenAPI schema for [`crate::domain::discovery::PlaceWithDistance`].
///
/// Every place field plus the distance from the search centre.
#[derive(ToSchema)]
#[schema(as = crate::domain::discovery::PlaceWithDistance, rename_all = "camelCase")]
pub struct NearbyPlaceSchema {
    id: String,
    provider_place_id: Option<String>,
    name: String,
    address: String,
    city: Option<String>,
    category: PlaceCategorySchema,
    coordinates: Option<CoordinatesSchema>,
    rating: Option<RatingSchema>,
    photos: Vec<PhotoSchema>,
    tags: Vec<String>,
    source: SourceKindSchema,
    is_partner: bool,
    created_at: Option<String>,
    raw: Option<serde_json::Value>,
    /// Great-circle distance in kilometres.
    #[schema(example = 1.27)]
    distance_km: f64,
}

/// OpenAPI schema for [`crate::domain::discovery::NearbyPage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::discovery::NearbyPage)]
pub struct NearbyResponseSchema {
    /// Places, nearest first.
    items: Vec<NearbyPlaceSchema>,
    /// Per-source totals before de-duplication.
    counts: SourceCountsSchema,
}

/// OpenAPI schema for [`crate::domain::geocoding::Activity`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geocoding::Activity, rename_all = "camelCase")]
pub struct ActivitySchema {
    /// Time of day as written.
    #[schema(example = "08:30")]
    time: Option<String>,
    /// What happens.
    #[schema(example = "Breakfast")]
    title: String,
    /// Free-text location to resolve.
    #[schema(example = "Bánh Khọt Gốc Vú Sữa")]
    location: String,
    description: Option<String>,
    /// Set by enrichment.
    coordinates: Option<CoordinatesSchema>,
    /// Set by enrichment.
    place_id: Option<String>,
    /// Set by enrichment.
    rating: Option<RatingSchema>,
    /// Set by enrichment.
    photos: Vec<PhotoSchema>,
}

/// OpenAPI schema for [`crate::domain::geocoding::ItineraryDay`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geocoding::ItineraryDay)]
pub struct ItineraryDaySchema {
    /// One-based day number.
    #[schema(example = 1)]
    day: u32,
    title: Option<String>,
    activities: Vec<ActivitySchema>,
}

/// OpenAPI schema for [`crate::domain::geocoding::Itinerary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geocoding::Itinerary)]
pub struct ItinerarySchema {
    /// Trip destination used to disambiguate locations.
    #[schema(example = "Vũng Tàu")]
    destination: Option<String>,
    days: Vec<ItineraryDaySchema>,
}

/// OpenAPI schema for [`crate::domain::geocoding::EnrichmentSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geocoding::EnrichmentSummary, rename_all = "camelCase")]
pub struct EnrichmentSummarySchema {
    locations: usize,
    resolved: usize,
    matched_activities: usize,
    unmatched_activities: usize,
}

/// OpenAPI schema for [`crate::domain::geocoding::EnrichedItinerary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::geocoding::EnrichedItinerary)]
pub struct EnrichedItinerarySchema {
    itinerary: ItinerarySchema,
    summary: EnrichmentSummarySchema,
}
