//! Geocode resolution cascade.
//!
//! Strategies run strictly in [`GeocodeStrategy::CASCADE`] order. Direct and
//! destination-qualified geocoding stop at the first coordinate match, while
//! the nearby search runs whenever a destination is known because it is also
//! the source of ratings and photos. A best-effort details lookup follows
//! whenever a place identifier surfaced.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::AddressRejectList;
use crate::domain::geo::haversine_m;
use crate::domain::ports::{
    CacheKey, GEOCODE_NAMESPACE, GeocodeHit, GeocodeProvider, GeocodeProviderError,
    NearbyPlace, NearbySearchRequest,
};
use crate::domain::text::contains_either_way;
use crate::domain::{Coordinates, JsonCache, Photo, Rating};

/// Free-text location plus an optional disambiguating destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeocodeQuery {
    /// Location as written by a human.
    pub address: String,
    /// City or region hint, e.g. "Đà Lạt".
    pub destination: Option<String>,
}

impl GeocodeQuery {
    /// Build a query, dropping a blank destination.
    pub fn new(address: impl Into<String>, destination: Option<&str>) -> Self {
        Self {
            address: address.into(),
            destination: destination
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
        }
    }

    /// `address|destination` cache key.
    pub fn cache_key(&self) -> CacheKey {
        let canonical = format!(
            "{}|{}",
            self.address.trim(),
            self.destination.as_deref().unwrap_or_default()
        );
        CacheKey::fingerprinted(GEOCODE_NAMESPACE, &canonical)
    }

    fn qualified_address(&self) -> Option<String> {
        self.destination
            .as_deref()
            .map(|destination| format!("{}, {destination}", self.address.trim()))
    }
}

/// Cascade step that produced the coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeStrategy {
    /// Raw address geocoded as given.
    Direct,
    /// Address qualified with the destination.
    WithDestination,
    /// Proximity search around the resolved point or destination centre.
    NearbySearch,
}

impl GeocodeStrategy {
    /// Execution order.
    pub const CASCADE: [Self; 3] = [Self::Direct, Self::WithDestination, Self::NearbySearch];

    /// Whether this step runs given the query and what earlier steps found.
    pub fn applies(self, query: &GeocodeQuery, draft: &GeocodeResult) -> bool {
        match self {
            Self::Direct => true,
            Self::WithDestination => !draft.is_resolved() && query.destination.is_some(),
            Self::NearbySearch => query.destination.is_some(),
        }
    }
}

/// Resolution outcome; unresolved results carry no coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    /// Input address, unchanged.
    pub address: String,
    /// Resolved location.
    pub coordinates: Option<Coordinates>,
    /// Provider place identifier.
    pub place_id: Option<String>,
    /// Name of the matched point of interest.
    pub name: Option<String>,
    /// Rating summary.
    pub rating: Option<Rating>,
    /// Photos, richest source first.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Provider's canonical address.
    pub formatted_address: Option<String>,
    /// Step that produced the coordinates.
    pub matched_by: Option<GeocodeStrategy>,
}

impl GeocodeResult {
    /// Result carrying only the input address.
    pub fn unresolved(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coordinates: None,
            place_id: None,
            name: None,
            rating: None,
            photos: Vec::new(),
            formatted_address: None,
            matched_by: None,
        }
    }

    /// Whether coordinates were found.
    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }

    fn apply_hit(&mut self, hit: GeocodeHit, strategy: GeocodeStrategy) {
        self.coordinates = Some(hit.coordinates);
        self.place_id = self.place_id.take().or(hit.place_id);
        self.formatted_address = self.formatted_address.take().or(hit.formatted_address);
        self.matched_by = Some(strategy);
    }

    fn apply_nearby(&mut self, place: NearbyPlace) {
        if self.coordinates.is_none() {
            if let Some(coordinates) = place.coordinates {
                self.coordinates = Some(coordinates);
                self.matched_by = Some(GeocodeStrategy::NearbySearch);
            }
        }
        self.place_id = Some(place.place_id);
        self.name = Some(place.name);
        self.rating = place.rating.or(self.rating);
        if !place.photos.is_empty() {
            self.photos = place.photos;
        }
        if self.formatted_address.is_none() {
            self.formatted_address = place.address;
        }
    }
}

/// Tunables for the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeConfig {
    /// Proximity search radius in metres.
    pub nearby_radius_m: u32,
    /// Distance within which an unnamed nearby result counts as a match.
    pub match_radius_m: f64,
    /// Cap on photos kept from a details lookup.
    pub max_detail_photos: usize,
    /// Concurrent resolutions per batch.
    pub batch_size: usize,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            nearby_radius_m: 5_000,
            match_radius_m: 100.0,
            max_detail_photos: 10,
            batch_size: 5,
        }
    }
}

/// Resolves free-text locations through the cascade and the geocode cache.
#[derive(Clone)]
pub struct GeocodeResolver {
    provider: Arc<dyn GeocodeProvider>,
    cache: JsonCache<GeocodeResult>,
    reject_list: AddressRejectList,
    config: GeocodeConfig,
}

impl GeocodeResolver {
    /// Create a resolver.
    pub fn new(
        provider: Arc<dyn GeocodeProvider>,
        cache: JsonCache<GeocodeResult>,
        reject_list: AddressRejectList,
        config: GeocodeConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            reject_list,
            config,
        }
    }

    /// Resolve one location. Never fails; unresolved input comes back
    /// without coordinates.
    pub async fn resolve(&self, query: &GeocodeQuery) -> GeocodeResult {
        if self.reject_list.is_rejected(&query.address) {
            debug!(address = %query.address, "placeholder address skipped");
            return GeocodeResult::unresolved(query.address.clone());
        }
        let key = query.cache_key();
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let mut draft = GeocodeResult::unresolved(query.address.clone());
        for strategy in GeocodeStrategy::CASCADE {
            if !strategy.applies(query, &draft) {
                continue;
            }
            match self.run_step(strategy, query, &mut draft).await {
                Ok(true) => debug!(address = %query.address, ?strategy, "strategy matched"),
                Ok(false) => {}
                Err(error) => {
                    warn!(address = %query.address, ?strategy, %error, "geocode strategy failed");
                }
            }
        }
        self.attach_details(&mut draft).await;

        if draft.is_resolved() {
            self.cache.put(&key, &draft).await;
        } else {
            info!(address = %query.address, "location left unresolved");
        }
        draft
    }

    /// Resolve `queries` in bounded concurrent batches, preserving order.
    pub async fn resolve_many(&self, queries: &[GeocodeQuery]) -> Vec<GeocodeResult> {
        let mut results = Vec::with_capacity(queries.len());
        for batch in queries.chunks(self.config.batch_size.max(1)) {
            results.extend(join_all(batch.iter().map(|query| self.resolve(query))).await);
        }
        results
    }

    async fn run_step(
        &self,
        strategy: GeocodeStrategy,
        query: &GeocodeQuery,
        draft: &mut GeocodeResult,
    ) -> Result<bool, GeocodeProviderError> {
        match strategy {
            GeocodeStrategy::Direct => self.geocode_into(query.address.trim(), strategy, draft).await,
            GeocodeStrategy::WithDestination => match query.qualified_address() {
                Some(qualified) => self.geocode_into(&qualified, strategy, draft).await,
                None => Ok(false),
            },
            GeocodeStrategy::NearbySearch => self.nearby_into(query, draft).await,
        }
    }

    async fn geocode_into(
        &self,
        address: &str,
        strategy: GeocodeStrategy,
        draft: &mut GeocodeResult,
    ) -> Result<bool, GeocodeProviderError> {
        match retry_once("geocode", || self.provider.geocode(address)).await? {
            Some(hit) => {
                draft.apply_hit(hit, strategy);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn nearby_into(
        &self,
        query: &GeocodeQuery,
        draft: &mut GeocodeResult,
    ) -> Result<bool, GeocodeProviderError> {
        let Some(center) = self.search_center(query, draft).await? else {
            return Ok(false);
        };
        let request = NearbySearchRequest {
            center,
            radius_m: self.config.nearby_radius_m,
            keyword: Some(query.address.trim().to_owned()),
            category: None,
        };
        let results = retry_once("nearby_search", || self.provider.nearby_search(&request)).await?;
        match self.pick_nearby(query, draft.coordinates, results) {
            Some(place) => {
                draft.apply_nearby(place);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_center(
        &self,
        query: &GeocodeQuery,
        draft: &GeocodeResult,
    ) -> Result<Option<Coordinates>, GeocodeProviderError> {
        if let Some(coordinates) = draft.coordinates {
            return Ok(Some(coordinates));
        }
        let Some(destination) = query.destination.as_deref() else {
            return Ok(None);
        };
        Ok(retry_once("geocode", || self.provider.geocode(destination))
            .await?
            .map(|hit| hit.coordinates))
    }

    /// Prefer a result whose name overlaps the address. Otherwise take the
    /// nearest result within the match radius of known coordinates, or the
    /// provider's top result when nothing is known yet.
    fn pick_nearby(
        &self,
        query: &GeocodeQuery,
        known: Option<Coordinates>,
        results: Vec<NearbyPlace>,
    ) -> Option<NearbyPlace> {
        if let Some(index) = results
            .iter()
            .position(|place| contains_either_way(&place.name, &query.address))
        {
            return results.into_iter().nth(index);
        }
        match known {
            Some(origin) => results
                .into_iter()
                .filter_map(|place| {
                    let distance = haversine_m(origin, place.coordinates?);
                    (distance <= self.config.match_radius_m).then_some((distance, place))
                })
                .min_by(|(a, _), (b, _)| a.total_cmp(b))
                .map(|(_, place)| place),
            None => results.into_iter().next(),
        }
    }

    async fn attach_details(&self, draft: &mut GeocodeResult) {
        let Some(place_id) = draft.place_id.clone() else {
            return;
        };
        match retry_once("place_details", || self.provider.place_details(&place_id)).await {
            Ok(Some(details)) => {
                if !details.photos.is_empty() {
                    draft.photos = details.photos;
                    draft.photos.truncate(self.config.max_detail_photos);
                }
                draft.rating = details.rating.or(draft.rating);
                if draft.formatted_address.is_none() {
                    draft.formatted_address = details.formatted_address;
                }
            }
            Ok(None) => debug!(%place_id, "no place details available"),
            Err(error) => warn!(%place_id, %error, "place details lookup failed; keeping partial data"),
        }
    }
}

/// Repeat `call` once when its first attempt fails with a retryable error.
async fn retry_once<T, F, Fut>(operation: &'static str, call: F) -> Result<T, GeocodeProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, GeocodeProviderError>>,
{
    match call().await {
        Err(error) if error.is_retryable() => {
            debug!(operation, %error, "retrying maps provider call");
            call().await
        }
        outcome => outcome,
    }
}
