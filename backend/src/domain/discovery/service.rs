//! Discovery orchestration: fan-out, pipeline stages, and the result cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use pagination::paginate;
use tracing::debug;

use super::{
    ExploreFilters, ExplorePage, NameProximitySimilarity, NearbyPage, NearbyQuery,
    PlaceSimilarity, SourceOutcome, aggregate, deduplicate, filter_by_distance, rank,
    sampling_seed, shuffle_seeded,
};
use crate::domain::ports::{
    CacheKey, EXPLORE_NAMESPACE, PlaceDiscovery, PlaceSource, PlaceSourceError,
    PlaceSourceQuery,
};
use crate::domain::{Error, ExploreQuery, JsonCache, SourceScope};

/// Tunables for the discovery pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Deadline applied to each source call.
    pub source_timeout: Duration,
    /// Cap on records requested from each datastore source.
    pub fetch_limit: usize,
    /// Cap on records requested from the live source during exploration.
    pub live_max_results: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(10),
            fetch_limit: 500,
            live_max_results: 5,
        }
    }
}

/// The three place sources.
#[derive(Clone)]
pub struct DiscoverySources {
    /// Curated catalogue.
    pub curated: Arc<dyn PlaceSource>,
    /// Partner store.
    pub partner: Arc<dyn PlaceSource>,
    /// Live maps provider.
    pub live: Arc<dyn PlaceSource>,
}

/// Domain service implementing [`PlaceDiscovery`].
#[derive(Clone)]
pub struct DiscoveryService {
    pub(super) sources: DiscoverySources,
    cache: JsonCache<ExplorePage>,
    pub(super) similarity: Arc<dyn PlaceSimilarity>,
    clock: Arc<dyn Clock>,
    pub(super) config: DiscoveryConfig,
}

impl DiscoveryService {
    /// Create a service using [`NameProximitySimilarity`] for de-duplication.
    pub fn new(
        sources: DiscoverySources,
        cache: JsonCache<ExplorePage>,
        clock: Arc<dyn Clock>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            sources,
            cache,
            similarity: Arc::new(NameProximitySimilarity::default()),
            clock,
            config,
        }
    }

    /// Replace the de-duplication predicate.
    #[must_use]
    pub fn with_similarity(mut self, similarity: Arc<dyn PlaceSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    async fn explore_uncached(
        &self,
        query: &ExploreQuery,
        window: Option<i64>,
    ) -> Result<ExplorePage, Error> {
        let base = PlaceSourceQuery {
            city: query.city.clone(),
            category: query.category,
            text: query.text.clone(),
            min_rating: query.min_rating,
            user_location: query.user_location,
            radius_m: None,
            limit: Some(self.config.fetch_limit),
            sort: query.sort,
            random: query.random,
        };
        let live = PlaceSourceQuery {
            limit: Some(self.config.live_max_results),
            ..base.clone()
        };

        let (curated, partner, live) = tokio::join!(
            self.consult_in_scope(&self.sources.curated, &base, query.scope),
            self.consult_in_scope(&self.sources.partner, &base, query.scope),
            self.consult_in_scope(&self.sources.live, &live, query.scope),
        );
        let merged = aggregate([curated, partner, live].into_iter().flatten());
        if merged.total_failure() {
            return Err(Error::service_unavailable("every place source failed"));
        }

        let merged_len = merged.records.len();
        let mut records = deduplicate(merged.records, self.similarity.as_ref());
        debug!(
            merged = merged_len,
            unique = records.len(),
            "de-duplicated places"
        );
        match window {
            Some(window) => {
                shuffle_seeded(&mut records, sampling_seed(&query.sampling_form(), window));
            }
            None => rank(&mut records, query.sort, query.user_location),
        }
        let records = filter_by_distance(records, query.user_location, query.max_distance_km);
        let page = paginate(records, query.page);

        Ok(ExplorePage {
            items: page.items,
            pagination: page.pagination,
            filters: ExploreFilters::from(query),
            counts: merged.counts,
            cached: false,
        })
    }

    async fn consult_in_scope(
        &self,
        source: &Arc<dyn PlaceSource>,
        query: &PlaceSourceQuery,
        scope: SourceScope,
    ) -> Option<SourceOutcome> {
        if scope.includes(source.kind()) {
            Some(self.consult(source.as_ref(), query).await)
        } else {
            None
        }
    }

    /// Call one source under the configured deadline.
    pub(super) async fn consult(
        &self,
        source: &dyn PlaceSource,
        query: &PlaceSourceQuery,
    ) -> SourceOutcome {
        let kind = source.kind();
        let deadline = self.config.source_timeout;
        let outcome = match tokio::time::timeout(deadline, source.fetch(query)).await {
            Ok(result) => result,
            Err(_) => Err(PlaceSourceError::timeout(format!(
                "{} did not answer within {deadline:?}",
                kind.label()
            ))),
        };
        (kind, outcome)
    }

    /// Index of the current result-cache window.
    fn sampling_window(&self) -> i64 {
        let ttl_secs = i64::try_from(self.cache.ttl().as_secs())
            .unwrap_or(i64::MAX)
            .max(1);
        self.clock.utc().timestamp().div_euclid(ttl_secs)
    }
}

#[async_trait]
impl PlaceDiscovery for DiscoveryService {
    async fn explore(&self, query: ExploreQuery) -> Result<ExplorePage, Error> {
        let query = query.normalize();
        // Random pages are keyed by sampling window so every page served in
        // one window comes from the same shuffle.
        let window = query.random.then(|| self.sampling_window());
        let key_material = match window {
            Some(window) => format!("{}|window={window}", query.canonical_form()),
            None => query.canonical_form(),
        };
        let key = CacheKey::fingerprinted(EXPLORE_NAMESPACE, &key_material);
        if let Some(mut page) = self.cache.get(&key).await {
            page.cached = true;
            return Ok(page);
        }
        let page = self.explore_uncached(&query, window).await?;
        self.cache.put(&key, &page).await;
        Ok(page)
    }

    async fn nearby(&self, query: NearbyQuery) -> Result<NearbyPage, Error> {
        self.find_nearby(query).await
    }
}
