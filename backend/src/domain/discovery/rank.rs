//! Ordering, seeded sampling, and the distance filter.
//!
//! Every comparator ends in a deterministic tie-break on source priority,
//! then identifier, so the final order never depends on which source
//! answered first.

use std::cmp::Ordering;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256};

use crate::domain::geo::haversine_km;
use crate::domain::{Coordinates, PlaceRecord, SortMode};

/// Slack applied to the distance filter's upper bound.
const DISTANCE_EPSILON_KM: f64 = 1e-9;

/// Sort `records` in place.
///
/// Distance sorting without an origin falls back to recency.
pub fn rank(records: &mut [PlaceRecord], sort: SortMode, origin: Option<Coordinates>) {
    match (sort, origin) {
        (SortMode::Rating, _) => records.sort_by(|a, b| {
            descending(a.rating_average(), b.rating_average())
                .then_with(|| b.rating_count().cmp(&a.rating_count()))
                .then_with(|| tie_break(a, b))
        }),
        (SortMode::Popular, _) => records.sort_by(|a, b| {
            b.rating_count()
                .cmp(&a.rating_count())
                .then_with(|| descending(a.rating_average(), b.rating_average()))
                .then_with(|| tie_break(a, b))
        }),
        (SortMode::Distance, Some(origin)) => records.sort_by(|a, b| {
            let da = distance_from(origin, a);
            let db = distance_from(origin, b);
            match (da, db) {
                (Some(da), Some(db)) => da.total_cmp(&db),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| tie_break(a, b))
        }),
        (SortMode::Recent | SortMode::Distance, _) => records.sort_by(|a, b| {
            // `None` sorts before `Some`, so reversing puts undated records last.
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| tie_break(a, b))
        }),
    }
}

/// Seeded uniform permutation.
///
/// Records are first put into a canonical order so the permutation depends
/// only on the seed and the record set.
pub fn shuffle_seeded(records: &mut [PlaceRecord], seed: u64) {
    records.sort_by(tie_break);
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);
}

/// Seed shared by every request with the same sampling form inside one
/// cache window.
///
/// ```
/// use waypoint::domain::discovery::sampling_seed;
///
/// assert_eq!(sampling_seed("city=hue", 7), sampling_seed("city=hue", 7));
/// assert_ne!(sampling_seed("city=hue", 7), sampling_seed("city=hue", 8));
/// ```
pub fn sampling_seed(sampling_form: &str, window: i64) -> u64 {
    let digest = Sha256::digest(format!("{sampling_form}|window={window}").as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Keep records within `max_km` of `origin`, preserving order.
///
/// Without both an origin and a radius the input passes through unchanged.
/// With an active filter, records lacking coordinates are dropped.
pub fn filter_by_distance(
    records: Vec<PlaceRecord>,
    origin: Option<Coordinates>,
    max_km: Option<f64>,
) -> Vec<PlaceRecord> {
    let (Some(origin), Some(max_km)) = (origin, max_km) else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| {
            distance_from(origin, record).is_some_and(|km| km <= max_km + DISTANCE_EPSILON_KM)
        })
        .collect()
}

/// Great-circle distance from `origin` to `record`, in kilometres.
pub fn distance_from(origin: Coordinates, record: &PlaceRecord) -> Option<f64> {
    record
        .coordinates
        .map(|coordinates| haversine_km(origin, coordinates))
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn tie_break(a: &PlaceRecord, b: &PlaceRecord) -> Ordering {
    a.source()
        .priority()
        .cmp(&b.source().priority())
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlaceCategory, Rating, SourceKind};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn place(id: &str, average: f64, count: u32) -> PlaceRecord {
        let mut record = PlaceRecord::new(id, id, PlaceCategory::Restaurant, SourceKind::Curated);
        record.rating = Some(Rating { average, count });
        record
    }

    fn located(id: &str, lat: f64, lng: f64) -> PlaceRecord {
        let mut record = place(id, 4.0, 1);
        record.coordinates = Some(Coordinates::try_new(lat, lng).expect("valid coordinates"));
        record
    }

    fn ids(records: &[PlaceRecord]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[fixture]
    fn origin() -> Coordinates {
        Coordinates::try_new(10.346, 107.084).expect("valid coordinates")
    }

    #[rstest]
    fn rating_orders_by_average_then_count() {
        let mut records = vec![place("a", 4.0, 10), place("b", 4.5, 1), place("c", 4.0, 50)];
        rank(&mut records, SortMode::Rating, None);
        assert_eq!(ids(&records), vec!["b", "c", "a"]);
        for pair in records.windows(2) {
            assert!(pair[0].rating_average() >= pair[1].rating_average());
        }
    }

    #[rstest]
    fn popular_orders_by_count_then_average() {
        let mut records = vec![place("a", 3.0, 10), place("b", 4.5, 10), place("c", 2.0, 99)];
        rank(&mut records, SortMode::Popular, None);
        assert_eq!(ids(&records), vec!["c", "b", "a"]);
    }

    #[rstest]
    fn recent_puts_undated_records_last() {
        let mut old = place("old", 4.0, 1);
        old.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date"));
        let mut new = place("new", 4.0, 1);
        new.created_at = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("date"));
        let mut records = vec![place("undated", 4.0, 1), old, new];
        rank(&mut records, SortMode::Recent, None);
        assert_eq!(ids(&records), vec!["new", "old", "undated"]);
    }

    #[rstest]
    fn distance_orders_nearest_first_with_unknown_last(origin: Coordinates) {
        let mut records = vec![
            place("nowhere", 5.0, 1),
            located("far", 10.7769, 106.7009),
            located("near", 10.3470, 107.0850),
        ];
        rank(&mut records, SortMode::Distance, Some(origin));
        assert_eq!(ids(&records), vec!["near", "far", "nowhere"]);
    }

    #[rstest]
    fn ties_break_on_source_priority_then_id() {
        let mut live = place("a", 4.0, 1);
        live.provenance = SourceKind::Live.into();
        let mut partner = place("z", 4.0, 1);
        partner.provenance = SourceKind::Partner.into();
        let mut records = vec![live, place("m", 4.0, 1), partner];
        rank(&mut records, SortMode::Rating, None);
        assert_eq!(ids(&records), vec!["z", "m", "a"]);
    }

    #[rstest]
    fn ranking_ignores_input_order() {
        let forward = vec![place("a", 4.0, 3), place("b", 4.0, 3), place("c", 3.0, 9)];
        let mut backward: Vec<_> = forward.iter().rev().cloned().collect();
        let mut forward = forward;
        rank(&mut forward, SortMode::Rating, None);
        rank(&mut backward, SortMode::Rating, None);
        assert_eq!(forward, backward);
    }

    #[rstest]
    fn seeded_shuffle_is_reproducible_and_order_independent() {
        let records: Vec<_> = (0..20).map(|n| place(&format!("p{n:02}"), 4.0, n)).collect();
        let mut first = records.clone();
        let mut second: Vec<_> = records.iter().rev().cloned().collect();
        shuffle_seeded(&mut first, 42);
        shuffle_seeded(&mut second, 42);
        assert_eq!(first, second);

        let mut sorted_ids: Vec<_> = ids(&first).into_iter().map(str::to_owned).collect();
        sorted_ids.sort();
        let expected: Vec<_> = ids(&records).into_iter().map(str::to_owned).collect();
        assert_eq!(sorted_ids, expected);
    }

    #[rstest]
    fn distance_filter_keeps_order_and_drops_unlocated(origin: Coordinates) {
        let records = vec![
            located("near-b", 10.3470, 107.0850),
            place("nowhere", 5.0, 1),
            located("far", 10.7769, 106.7009),
            located("near-a", 10.3400, 107.0800),
        ];
        let kept = filter_by_distance(records, Some(origin), Some(5.0));
        assert_eq!(ids(&kept), vec!["near-b", "near-a"]);
        for record in &kept {
            let km = distance_from(origin, record).expect("located");
            assert!(km <= 5.0);
        }
    }

    #[rstest]
    #[case(None, Some(5.0))]
    #[case(Some(()), None)]
    fn inactive_distance_filter_passes_through(
        origin: Coordinates,
        #[case] with_origin: Option<()>,
        #[case] max_km: Option<f64>,
    ) {
        let records = vec![place("nowhere", 5.0, 1), located("far", 10.7769, 106.7009)];
        let kept = filter_by_distance(records.clone(), with_origin.map(|()| origin), max_km);
        assert_eq!(kept, records);
    }
}
