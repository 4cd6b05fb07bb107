//! Live place source backed by the maps provider's proximity search.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    GeocodeProvider, GeocodeProviderError, NearbyPlace, NearbySearchRequest, PlaceSource,
    PlaceSourceError, PlaceSourceQuery, SourcePage,
};
use crate::domain::{PlaceRecord, Provenance, SourceKind};

/// Radius used when the query names a city but no explicit radius.
pub const DEFAULT_LIVE_RADIUS_M: u32 = 5_000;

/// Place source answering from a live proximity search.
///
/// The provider can only search around a point, so queries without a user
/// location yield an empty page. A query must also be anchored by either a
/// city or an explicit radius; an unanchored query is treated as out of
/// scope rather than searched with an arbitrary radius.
pub struct LivePlaceSource {
    provider: Arc<dyn GeocodeProvider>,
    default_radius_m: u32,
    max_results: usize,
}

impl LivePlaceSource {
    /// Source returning at most `max_results` records per call.
    pub fn new(provider: Arc<dyn GeocodeProvider>, max_results: usize) -> Self {
        Self {
            provider,
            default_radius_m: DEFAULT_LIVE_RADIUS_M,
            max_results,
        }
    }

    /// Override the radius applied to city-anchored queries.
    #[must_use]
    pub fn with_default_radius(mut self, radius_m: u32) -> Self {
        self.default_radius_m = radius_m;
        self
    }

    fn request_for(&self, query: &PlaceSourceQuery) -> Option<NearbySearchRequest> {
        let center = query.user_location?;
        let radius_m = match (query.radius_m, query.city.as_deref()) {
            (Some(radius_m), _) => radius_m,
            (None, Some(_)) => self.default_radius_m,
            (None, None) => return None,
        };
        Some(NearbySearchRequest {
            center,
            radius_m,
            keyword: query.text.clone(),
            category: query.category,
        })
    }
}

#[async_trait]
impl PlaceSource for LivePlaceSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    async fn fetch(&self, query: &PlaceSourceQuery) -> Result<SourcePage, PlaceSourceError> {
        let Some(request) = self.request_for(query) else {
            debug!("live source skipped: query has no location anchor");
            return Ok(SourcePage::default());
        };
        let cap = query
            .limit
            .map_or(self.max_results, |limit| limit.min(self.max_results));
        let places = self
            .provider
            .nearby_search(&request)
            .await
            .map_err(map_provider_error)?;

        let records = places
            .into_iter()
            .map(|place| to_record(place, query.city.as_deref()))
            .filter(|record| {
                query
                    .min_rating
                    .is_none_or(|min| record.rating.is_some_and(|rating| rating.average >= min))
            })
            .take(cap)
            .collect();
        Ok(SourcePage::complete(records))
    }
}

fn to_record(place: NearbyPlace, city: Option<&str>) -> PlaceRecord {
    PlaceRecord {
        id: place.place_id.clone(),
        provider_place_id: Some(place.place_id),
        name: place.name,
        address: place.address.unwrap_or_default(),
        city: city.map(str::to_owned),
        category: place.category,
        coordinates: place.coordinates,
        rating: place.rating,
        photos: place.photos,
        tags: Default::default(),
        provenance: Provenance::from(SourceKind::Live),
        created_at: None,
        raw: place.raw,
    }
}

fn map_provider_error(error: GeocodeProviderError) -> PlaceSourceError {
    match error {
        GeocodeProviderError::Timeout { message } => PlaceSourceError::timeout(message),
        other => PlaceSourceError::upstream(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockGeocodeProvider;
    use crate::domain::{Coordinates, PlaceCategory, Rating};
    use crate::test_support::geocoding::{ProviderCall, ScriptedGeocodeProvider};
    use rstest::rstest;
    use serde_json::Value;

    fn vung_tau() -> Coordinates {
        Coordinates::try_new(10.346, 107.084).expect("valid coordinates")
    }

    fn nearby(id: &str, average: f64) -> NearbyPlace {
        NearbyPlace {
            place_id: id.to_owned(),
            name: format!("Place {id}"),
            address: Some("Thùy Vân".to_owned()),
            coordinates: Some(vung_tau()),
            rating: Some(Rating {
                average,
                count: 10,
            }),
            photos: Vec::new(),
            category: PlaceCategory::Restaurant,
            raw: Value::Null,
        }
    }

    #[rstest]
    #[case::no_location(None, Some("Vũng Tàu"), None)]
    #[case::no_anchor(Some(vung_tau()), None, None)]
    #[tokio::test]
    async fn unanchored_queries_skip_the_provider(
        #[case] location: Option<Coordinates>,
        #[case] city: Option<&str>,
        #[case] radius_m: Option<u32>,
    ) {
        let mut provider = MockGeocodeProvider::new();
        provider.expect_nearby_search().never();
        let source = LivePlaceSource::new(Arc::new(provider), 5);
        let query = PlaceSourceQuery {
            user_location: location,
            city: city.map(str::to_owned),
            radius_m,
            ..PlaceSourceQuery::default()
        };

        let page = source.fetch(&query).await.expect("fetch succeeds");
        assert!(page.records.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn city_query_searches_default_radius_and_caps_results() {
        let provider = Arc::new(
            ScriptedGeocodeProvider::new()
                .with_nearby((0..8).map(|n| nearby(&format!("g-{n}"), 4.0)).collect()),
        );
        let source = LivePlaceSource::new(provider.clone(), 5);
        let query = PlaceSourceQuery {
            user_location: Some(vung_tau()),
            city: Some("Vũng Tàu".to_owned()),
            text: Some("bánh khọt".to_owned()),
            ..PlaceSourceQuery::default()
        };

        let page = source.fetch(&query).await.expect("fetch succeeds");
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.total, 5);
        let first = &page.records[0];
        assert_eq!(first.source(), SourceKind::Live);
        assert_eq!(first.provider_place_id.as_deref(), Some("g-0"));
        assert_eq!(first.city.as_deref(), Some("Vũng Tàu"));
        assert_eq!(
            provider.calls(),
            vec![ProviderCall::Nearby(NearbySearchRequest {
                center: vung_tau(),
                radius_m: DEFAULT_LIVE_RADIUS_M,
                keyword: Some("bánh khọt".to_owned()),
                category: None,
            })]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn explicit_radius_and_rating_filter_apply() {
        let provider = Arc::new(
            ScriptedGeocodeProvider::new().with_nearby(vec![nearby("low", 3.0), nearby("high", 4.6)]),
        );
        let source = LivePlaceSource::new(provider.clone(), 5);
        let query = PlaceSourceQuery {
            user_location: Some(vung_tau()),
            radius_m: Some(1_200),
            min_rating: Some(4.0),
            limit: Some(3),
            ..PlaceSourceQuery::default()
        };

        let page = source.fetch(&query).await.expect("fetch succeeds");
        let ids: Vec<_> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["high"]);
        assert!(matches!(
            provider.calls().as_slice(),
            [ProviderCall::Nearby(NearbySearchRequest { radius_m: 1_200, .. })]
        ));
    }

    #[rstest]
    #[case::timeout(GeocodeProviderError::timeout("slow"), true)]
    #[case::quota(GeocodeProviderError::rate_limited("quota"), false)]
    #[tokio::test]
    async fn provider_errors_map_to_source_errors(
        #[case] error: GeocodeProviderError,
        #[case] is_timeout: bool,
    ) {
        let mut provider = MockGeocodeProvider::new();
        provider
            .expect_nearby_search()
            .times(1)
            .return_once(move |_| Err(error));
        let source = LivePlaceSource::new(Arc::new(provider), 5);
        let query = PlaceSourceQuery {
            user_location: Some(vung_tau()),
            radius_m: Some(500),
            ..PlaceSourceQuery::default()
        };

        let err = source.fetch(&query).await.expect_err("fetch fails");
        assert_eq!(matches!(err, PlaceSourceError::Timeout { .. }), is_timeout);
        assert_eq!(matches!(err, PlaceSourceError::Upstream { .. }), !is_timeout);
    }
}
