//! Place discovery endpoints.
//!
//! ```text
//! GET /api/v1/places/explore
//! GET /api/v1/places/nearby
//! ```
//!
//! Explore parameters are parsed leniently: anything malformed is ignored
//! and the domain normalisation fills in defaults. Nearby needs a valid
//! location, so `lat`/`lng` are required.

use actix_web::{HttpResponse, get, web};
use pagination::{DEFAULT_LIMIT, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::discovery::{
    DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_M, MAX_NEARBY_LIMIT, NearbyQuery,
};
use crate::domain::{Error, ExploreQuery, PlaceCategory, SortMode, SourceScope};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{private_no_cache_header, public_short_lived_header};
use crate::inbound::http::schemas::{ErrorSchema, ExploreResponseSchema, NearbyResponseSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    lenient_f64, lenient_flag, lenient_i64, lenient_location, required_location,
};

/// Largest nearby search radius accepted, in metres.
pub const MAX_NEARBY_RADIUS_M: u32 = 50_000;

/// Raw query string for `GET /places/explore`.
///
/// Every field is kept as text so a malformed value degrades to "absent"
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExploreParams {
    /// One-based page number.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size, clamped to `[1, 100]`.
    #[param(example = "24")]
    pub limit: Option<String>,
    /// City filter, matched case-insensitively.
    #[param(example = "Vũng Tàu")]
    pub city: Option<String>,
    /// Category identifier; unknown values are ignored.
    #[param(example = "restaurant")]
    pub category: Option<String>,
    /// Free-text filter.
    pub q: Option<String>,
    /// Minimum rating average, clamped to five.
    pub min_rating: Option<String>,
    /// `rating`, `recent`, `popular`, or `distance`.
    #[param(example = "rating")]
    pub sort: Option<String>,
    /// User latitude.
    pub lat: Option<String>,
    /// User longitude.
    pub lng: Option<String>,
    /// `all`, `places`, `partners`, or `google`.
    pub source: Option<String>,
    /// `true` for a seeded shuffle instead of deterministic ordering.
    pub random: Option<String>,
    /// Distance radius in kilometres; only applied with a user location.
    pub max_distance: Option<String>,
}

impl ExploreParams {
    /// Parse into a normalised [`ExploreQuery`].
    pub fn into_query(self) -> ExploreQuery {
        ExploreQuery {
            page: PageRequest::from_raw(
                lenient_i64(self.page.as_deref()),
                lenient_i64(self.limit.as_deref()),
                DEFAULT_LIMIT,
            ),
            city: self.city,
            category: lenient_category(self.category.as_deref()),
            text: self.q,
            min_rating: lenient_f64(self.min_rating.as_deref()),
            sort: self
                .sort
                .as_deref()
                .map_or_else(SortMode::default, SortMode::parse_lenient),
            user_location: lenient_location(self.lat.as_deref(), self.lng.as_deref()),
            scope: self
                .source
                .as_deref()
                .map_or_else(SourceScope::default, SourceScope::parse_lenient),
            max_distance_km: lenient_f64(self.max_distance.as_deref()),
            random: lenient_flag(self.random.as_deref()),
            sort_downgraded: false,
        }
        .normalize()
    }
}

/// Raw query string for `GET /places/nearby`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyParams {
    /// Search centre latitude. Required.
    #[param(example = "10.346")]
    pub lat: Option<String>,
    /// Search centre longitude. Required.
    #[param(example = "107.084")]
    pub lng: Option<String>,
    /// Search radius in metres, capped at 50000.
    #[param(example = "5000")]
    pub radius: Option<String>,
    /// Category identifier; unknown values are ignored.
    pub category: Option<String>,
    /// Result cap, clamped to `[1, 100]`.
    #[param(example = "20")]
    pub limit: Option<String>,
}

impl NearbyParams {
    /// Parse into a [`NearbyQuery`], failing only on a missing or invalid
    /// location.
    pub fn into_query(self) -> Result<NearbyQuery, Error> {
        let location = required_location(self.lat.as_deref(), self.lng.as_deref())?;
        let radius_m = lenient_i64(self.radius.as_deref())
            .filter(|radius| *radius > 0)
            .map_or(DEFAULT_NEARBY_RADIUS_M, |radius| {
                u32::try_from(radius).unwrap_or(u32::MAX).min(MAX_NEARBY_RADIUS_M)
            });
        let limit = lenient_i64(self.limit.as_deref()).map_or(DEFAULT_NEARBY_LIMIT, |limit| {
            usize::try_from(limit.max(1))
                .unwrap_or(MAX_NEARBY_LIMIT)
                .min(MAX_NEARBY_LIMIT)
        });
        Ok(NearbyQuery {
            location,
            radius_m,
            category: lenient_category(self.category.as_deref()),
            limit,
        })
    }
}

fn lenient_category(raw: Option<&str>) -> Option<PlaceCategory> {
    raw.and_then(|value| value.parse().ok())
}

/// Federated place discovery.
#[utoipa::path(
    get,
    path = "/api/v1/places/explore",
    description = "Merge curated, partner, and live places into one filtered, ranked, paginated list. Example request: GET /api/v1/places/explore?city=Vung%20Tau&category=restaurant&sort=rating",
    params(ExploreParams),
    responses(
        (
            status = 200,
            description = "One page of places",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = ExploreResponseSchema
        ),
        (status = 503, description = "Every consulted source failed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "explorePlaces"
)]
#[get("/places/explore")]
pub async fn explore_places(
    state: web::Data<HttpState>,
    params: web::Query<ExploreParams>,
) -> ApiResult<HttpResponse> {
    let page = state.discovery.explore(params.into_inner().into_query()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_lived_header())
        .json(page))
}

/// Places around a point, partner placements first within their budget.
#[utoipa::path(
    get,
    path = "/api/v1/places/nearby",
    description = "Return partner and live places within a radius, nearest first. Example request: GET /api/v1/places/nearby?lat=10.346&lng=107.084&radius=2000",
    params(NearbyParams),
    responses(
        (
            status = 200,
            description = "Places ordered by distance",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = NearbyResponseSchema
        ),
        (status = 400, description = "Missing or invalid location", body = ErrorSchema),
        (status = 503, description = "Every consulted source failed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "nearbyPlaces"
)]
#[get("/places/nearby")]
pub async fn nearby_places(
    state: web::Data<HttpState>,
    params: web::Query<NearbyParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().into_query()?;
    let page = state.discovery.nearby(query).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(page))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::body::to_bytes;
    use actix_web::http::{StatusCode, header};
    use actix_web::App;
    use actix_web::test as actix_test;
    use pagination::PageInfo;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::discovery::{
        ExploreFilters, ExplorePage, NearbyPage, PlaceWithDistance, SourceCounts,
    };
    use crate::domain::ports::{MockItineraryEnrichment, MockPlaceDiscovery};
    use crate::domain::{Coordinates, SourceKind};
    use crate::inbound::http::cache_control::{PRIVATE_NO_CACHE, PUBLIC_SHORT_LIVED};
    use crate::test_support::places::PlaceBuilder;

    fn params(pairs: &[(&str, &str)]) -> ExploreParams {
        let query = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        web::Query::<ExploreParams>::from_query(&query)
            .expect("query string deserialises")
            .into_inner()
    }

    fn nearby(pairs: &[(&str, &str)]) -> NearbyParams {
        let query = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        web::Query::<NearbyParams>::from_query(&query)
            .expect("query string deserialises")
            .into_inner()
    }

    fn single_item_page(query: &ExploreQuery) -> ExplorePage {
        ExplorePage {
            items: vec![
                PlaceBuilder::new("p-1", "Gành Hào", SourceKind::Curated)
                    .city("Vũng Tàu")
                    .build(),
            ],
            pagination: PageInfo::new(query.page, 1),
            filters: ExploreFilters::from(query),
            counts: SourceCounts::default(),
            cached: false,
        }
    }

    fn state_with(discovery: MockPlaceDiscovery) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(discovery),
            Arc::new(MockItineraryEnrichment::new()),
        ))
    }

    #[rstest]
    fn explore_params_parse_every_field() {
        let query = params(&[
            ("page", "2"),
            ("limit", "10"),
            ("city", "Vũng Tàu"),
            ("category", "Restaurant"),
            ("q", "seafood"),
            ("minRating", "4.5"),
            ("sort", "distance"),
            ("lat", "10.346"),
            ("lng", "107.084"),
            ("source", "partners"),
            ("random", "true"),
            ("maxDistance", "12"),
        ])
        .into_query();
        assert_eq!(query.page, PageRequest::new(2, 10));
        assert_eq!(query.city.as_deref(), Some("Vũng Tàu"));
        assert_eq!(query.category, Some(PlaceCategory::Restaurant));
        assert_eq!(query.text.as_deref(), Some("seafood"));
        assert_eq!(query.min_rating, Some(4.5));
        assert_eq!(query.sort, SortMode::Distance);
        assert_eq!(query.scope, SourceScope::Partners);
        assert_eq!(query.max_distance_km, Some(12.0));
        assert!(query.random);
        assert!(!query.sort_downgraded);
    }

    #[rstest]
    fn malformed_explore_params_fall_back_to_defaults() {
        let query = params(&[
            ("page", "abc"),
            ("limit", "-3"),
            ("category", "spaceport"),
            ("minRating", "lots"),
            ("sort", "distance"),
            ("lat", "north"),
            ("lng", "107.0"),
            ("source", "everything"),
            ("random", "maybe"),
        ])
        .into_query();
        assert_eq!(query.page, PageRequest::new(1, 1));
        assert_eq!(query.category, None);
        assert_eq!(query.min_rating, None);
        assert_eq!(query.user_location, None);
        assert_eq!(query.sort, SortMode::Recent);
        assert!(query.sort_downgraded);
        assert_eq!(query.scope, SourceScope::All);
        assert!(!query.random);
    }

    #[rstest]
    fn empty_explore_params_use_default_page_size() {
        let query = ExploreParams::default().into_query();
        assert_eq!(query.page, PageRequest::new(1, DEFAULT_LIMIT));
        assert_eq!(query.scope, SourceScope::All);
    }

    #[rstest]
    #[case(&[("lat", "10.346"), ("lng", "107.084")], DEFAULT_NEARBY_RADIUS_M, DEFAULT_NEARBY_LIMIT)]
    #[case(&[("lat", "10.346"), ("lng", "107.084"), ("radius", "900000"), ("limit", "500")], MAX_NEARBY_RADIUS_M, MAX_NEARBY_LIMIT)]
    #[case(&[("lat", "10.346"), ("lng", "107.084"), ("radius", "-5"), ("limit", "0")], DEFAULT_NEARBY_RADIUS_M, 1)]
    #[case(&[("lat", "10.346"), ("lng", "107.084"), ("radius", "wide"), ("limit", "7")], DEFAULT_NEARBY_RADIUS_M, 7)]
    fn nearby_params_clamp_radius_and_limit(
        #[case] pairs: &[(&str, &str)],
        #[case] radius_m: u32,
        #[case] limit: usize,
    ) {
        let query = nearby(pairs).into_query().expect("valid location");
        assert_eq!(query.radius_m, radius_m);
        assert_eq!(query.limit, limit);
    }

    #[rstest]
    #[case(&[("lng", "107.084")], "lat", "missing_field")]
    #[case(&[("lat", "10.346")], "lng", "missing_field")]
    #[case(&[("lat", "ten"), ("lng", "107.084")], "lat", "invalid_number")]
    #[case(&[("lat", "95"), ("lng", "107.084")], "lat", "out_of_range")]
    #[case(&[("lat", "10.346"), ("lng", "200")], "lng", "out_of_range")]
    fn nearby_params_reject_bad_location(
        #[case] pairs: &[(&str, &str)],
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = nearby(pairs).into_query().expect_err("location rejected");
        let details = err.details().expect("details present");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn explore_forwards_the_normalised_query() {
        let mut discovery = MockPlaceDiscovery::new();
        discovery
            .expect_explore()
            .withf(|query| {
                query.city.as_deref() == Some("Vũng Tàu")
                    && query.category == Some(PlaceCategory::Restaurant)
                    && query.sort == SortMode::Rating
            })
            .times(1)
            .returning(|query| Ok(single_item_page(&query)));
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(discovery))
                .service(explore_places),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/places/explore?city=V%C5%A9ng%20T%C3%A0u&category=restaurant&sort=rating")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some(PUBLIC_SHORT_LIVED)
        );
        let body: Value =
            serde_json::from_slice(&to_bytes(res.into_body()).await.expect("body bytes"))
                .expect("json body");
        assert_eq!(body["items"][0]["name"], "Gành Hào");
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["filters"]["sort"], "rating");
        assert_eq!(body["cached"], false);
    }

    #[rstest]
    #[actix_web::test]
    async fn explore_maps_total_failure_to_service_unavailable() {
        let mut discovery = MockPlaceDiscovery::new();
        discovery
            .expect_explore()
            .returning(|_| Err(Error::service_unavailable("every place source failed")));
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(discovery))
                .service(explore_places),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/places/explore").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value =
            serde_json::from_slice(&to_bytes(res.into_body()).await.expect("body bytes"))
                .expect("json body");
        assert_eq!(body["code"], "service_unavailable");
    }

    #[rstest]
    #[actix_web::test]
    async fn nearby_returns_distance_annotated_items() {
        let mut discovery = MockPlaceDiscovery::new();
        discovery
            .expect_nearby()
            .withf(|query| query.radius_m == 2000 && query.limit == DEFAULT_NEARBY_LIMIT)
            .times(1)
            .returning(|query| {
                let place = PlaceBuilder::new("g-1", "Bãi Sau", SourceKind::Live)
                    .at(query.location.latitude(), query.location.longitude())
                    .build();
                Ok(NearbyPage {
                    items: vec![PlaceWithDistance {
                        place,
                        distance_km: 0.0,
                    }],
                    counts: SourceCounts::default(),
                })
            });
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(discovery))
                .service(nearby_places),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/places/nearby?lat=10.346&lng=107.084&radius=2000")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some(PRIVATE_NO_CACHE)
        );
        let body: Value =
            serde_json::from_slice(&to_bytes(res.into_body()).await.expect("body bytes"))
                .expect("json body");
        assert_eq!(body["items"][0]["name"], "Bãi Sau");
        assert_eq!(body["items"][0]["distanceKm"], 0.0);
    }

    #[rstest]
    #[actix_web::test]
    async fn nearby_without_location_is_bad_request() {
        let mut discovery = MockPlaceDiscovery::new();
        discovery.expect_nearby().never();
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(discovery))
                .service(nearby_places),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/places/nearby?lng=107.084")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&to_bytes(res.into_body()).await.expect("body bytes"))
                .expect("json body");
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "lat");
        assert_eq!(body["details"]["code"], "missing_field");
    }

    #[rstest]
    fn coordinates_survive_explore_parsing() {
        let query = params(&[("lat", "10.346"), ("lng", "107.084")]).into_query();
        assert_eq!(
            query.user_location,
            Some(Coordinates::try_new(10.346, 107.084).expect("valid"))
        );
    }
}
