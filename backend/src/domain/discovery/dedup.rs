//! Collapsing records that denote the same physical place.
//!
//! Records are visited in source-priority order (partner, curated, live) and
//! a record is kept only if no already-kept record is the same place. The
//! surviving copy of any duplicate group is therefore the highest-priority
//! one.

use crate::domain::geo::haversine_m;
use crate::domain::text::normalize_name;
use crate::domain::PlaceRecord;

/// Default proximity tolerance for name matches, in metres.
pub const DEFAULT_PROXIMITY_TOLERANCE_M: f64 = 50.0;

/// Decides whether two records denote the same place.
pub trait PlaceSimilarity: Send + Sync {
    /// Whether `a` and `b` are the same real-world place.
    fn same_place(&self, a: &PlaceRecord, b: &PlaceRecord) -> bool;
}

/// Identifier match, else normalised-name match within a distance tolerance.
///
/// Name matching applies only across different sources; within one source,
/// only identical identifiers collapse. When either record lacks coordinates
/// a name match alone is enough.
#[derive(Debug, Clone, Copy)]
pub struct NameProximitySimilarity {
    tolerance_m: f64,
}

impl Default for NameProximitySimilarity {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_TOLERANCE_M)
    }
}

impl NameProximitySimilarity {
    /// Similarity with a custom tolerance in metres.
    pub fn new(tolerance_m: f64) -> Self {
        Self { tolerance_m }
    }
}

impl PlaceSimilarity for NameProximitySimilarity {
    fn same_place(&self, a: &PlaceRecord, b: &PlaceRecord) -> bool {
        if a.source() == b.source() {
            return a.id == b.id;
        }
        if let (Some(left), Some(right)) = (&a.provider_place_id, &b.provider_place_id) {
            if left == right {
                return true;
            }
        }
        let name = normalize_name(&a.name);
        if name.is_empty() || name != normalize_name(&b.name) {
            return false;
        }
        match (a.coordinates, b.coordinates) {
            (Some(left), Some(right)) => haversine_m(left, right) <= self.tolerance_m,
            _ => true,
        }
    }
}

/// Drop every record that duplicates a higher-priority one.
///
/// Output is in source-priority order, stable within each source.
pub fn deduplicate(
    mut records: Vec<PlaceRecord>,
    similarity: &dyn PlaceSimilarity,
) -> Vec<PlaceRecord> {
    records.sort_by_key(|record| record.source().priority());
    let mut kept: Vec<PlaceRecord> = Vec::with_capacity(records.len());
    for record in records {
        if !kept.iter().any(|existing| similarity.same_place(existing, &record)) {
            kept.push(record);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, PlaceCategory, SourceKind};
    use rstest::rstest;

    fn at(id: &str, name: &str, source: SourceKind, lat: f64, lng: f64) -> PlaceRecord {
        let mut record = PlaceRecord::new(id, name, PlaceCategory::Restaurant, source);
        record.coordinates = Some(Coordinates::try_new(lat, lng).expect("valid coordinates"));
        record
    }

    #[rstest]
    fn partner_copy_wins_over_curated_and_live() {
        let records = vec![
            at("g1", "Gành Hào 1", SourceKind::Live, 10.3301, 107.0851),
            at("c1", "gành hào  1!", SourceKind::Curated, 10.3302, 107.0851),
            at("p1", "Gành Hào 1", SourceKind::Partner, 10.3301, 107.0852),
        ];
        let kept = deduplicate(records, &NameProximitySimilarity::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "p1");
    }

    #[rstest]
    fn same_name_far_apart_is_kept() {
        let records = vec![
            at("c1", "Highlands Coffee", SourceKind::Curated, 10.3460, 107.0840),
            at("g1", "Highlands Coffee", SourceKind::Live, 10.7769, 106.7009),
        ];
        assert_eq!(
            deduplicate(records, &NameProximitySimilarity::default()).len(),
            2
        );
    }

    #[rstest]
    fn name_match_without_coordinates_collapses() {
        let curated = PlaceRecord::new(
            "c1",
            "Bánh Khọt Gốc Vú Sữa",
            PlaceCategory::Restaurant,
            SourceKind::Curated,
        );
        let live = at("g1", "Bánh khọt gốc vú sữa", SourceKind::Live, 10.35, 107.07);
        let kept = deduplicate(vec![live, curated], &NameProximitySimilarity::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source(), SourceKind::Curated);
    }

    #[rstest]
    fn shared_provider_identifier_collapses_despite_names() {
        let mut curated = at("c1", "Bạch Dinh", SourceKind::Curated, 10.35, 107.07);
        curated.provider_place_id = Some("ChIJ-white-palace".to_owned());
        let mut live = at("g1", "White Palace", SourceKind::Live, 10.36, 107.08);
        live.provider_place_id = Some("ChIJ-white-palace".to_owned());
        assert_eq!(
            deduplicate(vec![live, curated], &NameProximitySimilarity::default()).len(),
            1
        );
    }

    #[rstest]
    fn same_source_collapses_only_identical_ids() {
        let records = vec![
            at("c1", "Phở Hòa", SourceKind::Curated, 10.0, 106.0),
            at("c2", "Phở Hòa", SourceKind::Curated, 10.0, 106.0),
            at("c1", "Phở Hòa", SourceKind::Curated, 10.0, 106.0),
        ];
        let kept = deduplicate(records, &NameProximitySimilarity::default());
        let ids: Vec<_> = kept.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[rstest]
    fn custom_similarity_is_honoured() {
        struct Never;
        impl PlaceSimilarity for Never {
            fn same_place(&self, _: &PlaceRecord, _: &PlaceRecord) -> bool {
                false
            }
        }
        let records = vec![
            at("c1", "Same", SourceKind::Curated, 10.0, 106.0),
            at("p1", "Same", SourceKind::Partner, 10.0, 106.0),
        ];
        assert_eq!(deduplicate(records, &Never).len(), 2);
    }
}
