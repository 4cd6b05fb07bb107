//! Proximity search mixing priority and live places.
//!
//! The result budget is split roughly 30/70 between the partner store and
//! the live provider, then the merged set goes through the usual
//! de-duplication and distance filter.

use tracing::debug;

use super::{
    DiscoveryService, NearbyPage, NearbyQuery, PlaceWithDistance, aggregate, deduplicate,
    distance_from, filter_by_distance, rank,
};
use crate::domain::ports::PlaceSourceQuery;
use crate::domain::{Error, PlaceRecord, SortMode};

/// Default search radius in metres.
pub const DEFAULT_NEARBY_RADIUS_M: u32 = 5_000;
/// Default number of nearby results.
pub const DEFAULT_NEARBY_LIMIT: usize = 20;
/// Upper bound on nearby results.
pub const MAX_NEARBY_LIMIT: usize = 100;
/// Percentage of the budget reserved for priority places, rounded up.
pub const PRIORITY_SHARE_PERCENT: usize = 30;

/// Split `limit` into `(priority, live)` budgets.
///
/// ```
/// use waypoint::domain::discovery::split_budget;
///
/// assert_eq!(split_budget(20), (6, 14));
/// assert_eq!(split_budget(1), (1, 0));
/// ```
pub fn split_budget(limit: usize) -> (usize, usize) {
    let bounded = limit.clamp(1, MAX_NEARBY_LIMIT);
    let priority = (bounded * PRIORITY_SHARE_PERCENT).div_ceil(100);
    (priority, bounded - priority)
}

impl DiscoveryService {
    pub(super) async fn find_nearby(&self, query: NearbyQuery) -> Result<NearbyPage, Error> {
        let limit = query.limit.clamp(1, MAX_NEARBY_LIMIT);
        let (priority_budget, live_budget) = split_budget(limit);
        let radius_km = f64::from(query.radius_m) / 1000.0;

        let partner_query = PlaceSourceQuery {
            category: query.category,
            user_location: Some(query.location),
            radius_m: Some(query.radius_m),
            limit: Some(self.config.fetch_limit),
            sort: SortMode::Distance,
            ..PlaceSourceQuery::default()
        };
        let live_query = PlaceSourceQuery {
            limit: Some(live_budget),
            ..partner_query.clone()
        };

        let (partner, live) = tokio::join!(
            self.consult(self.sources.partner.as_ref(), &partner_query),
            async {
                if live_budget == 0 {
                    None
                } else {
                    Some(self.consult(self.sources.live.as_ref(), &live_query).await)
                }
            },
        );
        let merged = aggregate(std::iter::once(partner).chain(live));
        if merged.total_failure() {
            return Err(Error::service_unavailable("every nearby source failed"));
        }

        let (mut partners, others): (Vec<PlaceRecord>, Vec<PlaceRecord>) = merged
            .records
            .into_iter()
            .partition(|record| record.provenance.is_partner);
        partners = filter_by_distance(partners, Some(query.location), Some(radius_km));
        rank(&mut partners, SortMode::Distance, Some(query.location));
        partners.truncate(priority_budget);

        let mut records = deduplicate(
            partners.into_iter().chain(others).collect(),
            self.similarity.as_ref(),
        );
        records = filter_by_distance(records, Some(query.location), Some(radius_km));
        rank(&mut records, SortMode::Distance, Some(query.location));
        records.truncate(limit);
        debug!(returned = records.len(), "nearby search complete");

        let items = records
            .into_iter()
            .filter_map(|place| {
                distance_from(query.location, &place)
                    .map(|distance_km| PlaceWithDistance { place, distance_km })
            })
            .collect();
        Ok(NearbyPage {
            items,
            counts: merged.counts,
        })
    }
}
