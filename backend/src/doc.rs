//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: discovery, itinerary enrichment, and health endpoints
//! - **Schemas**: domain type wrappers from
//!   [`crate::inbound::http::schemas`] that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ActivitySchema, CoordinatesSchema, EnrichedItinerarySchema, EnrichmentSummarySchema,
    ErrorCodeSchema, ErrorSchema, ExploreFiltersSchema, ExploreResponseSchema, ItineraryDaySchema,
    ItinerarySchema, NearbyPlaceSchema, NearbyResponseSchema, PageInfoSchema, PhotoSchema,
    PlaceCategorySchema, PlaceSchema, RatingSchema, SourceCountsSchema, SourceKindSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waypoint discovery API",
        description = "Federated place discovery, nearby search, and itinerary geocoding.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::places::explore_places,
        crate::inbound::http::places::nearby_places,
        crate::inbound::http::itineraries::enrich_itinerary,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CoordinatesSchema,
        PlaceCategorySchema,
        SourceKindSchema,
        RatingSchema,
        PhotoSchema,
        PlaceSchema,
        PageInfoSchema,
        SourceCountsSchema,
        ExploreFiltersSchema,
        ExploreResponseSchema,
        NearbyPlaceSchema,
        NearbyResponseSchema,
        ActivitySchema,
        ItineraryDaySchema,
        ItinerarySchema,
        EnrichmentSummarySchema,
        EnrichedItinerarySchema,
    )),
    tags(
        (name = "places", description = "Place discovery across curated, partner, and live sources"),
        (name = "itineraries", description = "Itinerary geocoding and enrichment"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
