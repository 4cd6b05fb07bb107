//! Itinerary enrichment endpoint.
//!
//! ```text
//! POST /api/v1/itineraries/enrich
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::geocoding::Itinerary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::schemas::{EnrichedItinerarySchema, ErrorSchema, ItinerarySchema};
use crate::inbound::http::state::HttpState;

/// Geocode every activity location and attach coordinates, ratings, and
/// photos where a match is found.
#[utoipa::path(
    post,
    path = "/api/v1/itineraries/enrich",
    description = "Resolve each distinct activity location and annotate matching activities. Activities that cannot be resolved are returned unchanged.",
    request_body = ItinerarySchema,
    responses(
        (
            status = 200,
            description = "Enriched itinerary with pass statistics",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = EnrichedItinerarySchema
        ),
        (status = 400, description = "Malformed itinerary body", body = ErrorSchema),
        (status = 503, description = "Geocoding provider unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["itineraries"],
    operation_id = "enrichItinerary"
)]
#[post("/itineraries/enrich")]
pub async fn enrich_itinerary(
    state: web::Data<HttpState>,
    payload: web::Json<Itinerary>,
) -> ApiResult<HttpResponse> {
    let enriched = state.enrichment.enrich(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().insert_header(no_store_header()).json(enriched))
}
