//! End-to-end discovery over fixture sources and the in-process TTL cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use pagination::PageRequest;
use rstest::{fixture, rstest};
use waypoint::domain::discovery::{DiscoveryConfig, DiscoveryService, DiscoverySources};
use waypoint::domain::ports::{FixturePlaceSource, PlaceDiscovery};
use waypoint::domain::{ExploreQuery, JsonCache, PlaceCategory, SortMode, SourceKind};
use waypoint::outbound::cache::InMemoryTtlCache;
use waypoint::test_support::clock::MutableClock;
use waypoint::test_support::places::PlaceBuilder;

const EXPLORE_TTL: Duration = Duration::from_secs(300);

struct Harness {
    clock: Arc<MutableClock>,
    service: DiscoveryService,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).single().expect("valid instant"),
    ));
    let curated = vec![
        PlaceBuilder::new("c-1", "Gành Hào", SourceKind::Curated)
            .category(PlaceCategory::Restaurant)
            .city("Vũng Tàu")
            .at(10.3673, 107.0632)
            .rated(4.5, 1840)
            .build(),
        PlaceBuilder::new("c-2", "Bánh Khọt Gốc Vú Sữa", SourceKind::Curated)
            .category(PlaceCategory::Restaurant)
            .city("Vũng Tàu")
            .at(10.3524, 107.0826)
            .rated(4.3, 5120)
            .build(),
        PlaceBuilder::new("c-3", "Tượng Chúa Kitô Vua", SourceKind::Curated)
            .category(PlaceCategory::Attraction)
            .city("Vũng Tàu")
            .at(10.3265, 107.0847)
            .rated(4.7, 12650)
            .build(),
        PlaceBuilder::new("c-4", "Phở Hòa", SourceKind::Curated)
            .category(PlaceCategory::Restaurant)
            .city("Hồ Chí Minh")
            .at(10.7906, 106.6889)
            .rated(4.8, 9000)
            .build(),
    ];
    let partner = vec![
        PlaceBuilder::new("p-1", "Gành Hào", SourceKind::Partner)
            .category(PlaceCategory::Restaurant)
            .city("Vũng Tàu")
            .at(10.3674, 107.0633)
            .rated(4.5, 1840)
            .build(),
        PlaceBuilder::new("p-2", "Cô Ba", SourceKind::Partner)
            .category(PlaceCategory::Restaurant)
            .city("Vũng Tàu")
            .at(10.3461, 107.0772)
            .rated(4.1, 620)
            .build(),
    ];
    let cache = Arc::new(InMemoryTtlCache::new(clock.clone()));
    let service = DiscoveryService::new(
        DiscoverySources {
            curated: Arc::new(FixturePlaceSource::new(SourceKind::Curated, curated)),
            partner: Arc::new(FixturePlaceSource::new(SourceKind::Partner, partner)),
            live: Arc::new(FixturePlaceSource::empty(SourceKind::Live)),
        },
        JsonCache::new(cache, EXPLORE_TTL, "explore"),
        clock.clone(),
        DiscoveryConfig::default(),
    );
    Harness { clock, service }
}

fn vung_tau_restaurants() -> ExploreQuery {
    ExploreQuery {
        page: PageRequest::new(1, 10),
        city: Some("vũng tàu".to_owned()),
        category: Some(PlaceCategory::Restaurant),
        sort: SortMode::Rating,
        ..ExploreQuery::default()
    }
}

#[rstest]
#[tokio::test]
async fn merges_sources_and_ranks_by_rating(harness: Harness) {
    let page = harness
        .service
        .explore(vung_tau_restaurants())
        .await
        .expect("explore succeeds");

    let names: Vec<_> = page.items.iter().map(|place| place.name.as_str()).collect();
    assert_eq!(names, vec!["Gành Hào", "Bánh Khọt Gốc Vú Sữa", "Cô Ba"]);
    assert!(page.items[0].provenance.is_partner, "partner copy survives");
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.counts.places, 2);
    assert_eq!(page.counts.partners, 2);
    assert_eq!(page.counts.google, 0);
    assert!(!page.cached);
}

#[rstest]
#[tokio::test]
async fn repeated_query_is_served_from_cache_until_expiry(harness: Harness) {
    let first = harness
        .service
        .explore(vung_tau_restaurants())
        .await
        .expect("first explore");
    assert!(!first.cached);

    harness.clock.advance_seconds(120);
    let second = harness
        .service
        .explore(vung_tau_restaurants())
        .await
        .expect("second explore");
    assert!(second.cached);
    assert_eq!(second.items, first.items);

    harness.clock.advance(EXPLORE_TTL);
    let third = harness
        .service
        .explore(vung_tau_restaurants())
        .await
        .expect("third explore");
    assert!(!third.cached);
}

#[rstest]
#[tokio::test]
async fn equivalent_queries_share_a_cache_entry(harness: Harness) {
    harness
        .service
        .explore(vung_tau_restaurants())
        .await
        .expect("warm cache");

    let padded = ExploreQuery {
        city: Some("  VŨNG TÀU ".to_owned()),
        ..vung_tau_restaurants()
    };
    let page = harness.service.explore(padded).await.expect("explore");
    assert!(page.cached);
}

#[rstest]
#[tokio::test]
async fn random_sampling_is_stable_across_pages_within_a_window(harness: Harness) {
    let sampled = |page| ExploreQuery {
        page: PageRequest::new(page, 2),
        city: Some("Vũng Tàu".to_owned()),
        random: true,
        ..ExploreQuery::default()
    };
    let first = harness.service.explore(sampled(1)).await.expect("page one");
    let second = harness.service.explore(sampled(2)).await.expect("page two");

    let mut ids: Vec<_> = first
        .items
        .iter()
        .chain(&second.items)
        .map(|place| place.id.clone())
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total, "pages of one sample never overlap");
    assert_eq!(total, 4);
}

#[rstest]
#[tokio::test]
async fn random_pages_are_recomputed_when_the_sampling_window_turns(harness: Harness) {
    let sampled = |page| ExploreQuery {
        page: PageRequest::new(page, 2),
        city: Some("Vũng Tàu".to_owned()),
        random: true,
        ..ExploreQuery::default()
    };
    harness.clock.advance_seconds(299);
    let early = harness.service.explore(sampled(1)).await.expect("late in window");
    assert!(!early.cached);

    harness.clock.advance_seconds(2);
    let first = harness.service.explore(sampled(1)).await.expect("page one");
    let second = harness.service.explore(sampled(2)).await.expect("page two");
    assert!(!first.cached, "page from the previous window is not reused");

    let mut ids: Vec<_> = first
        .items
        .iter()
        .chain(&second.items)
        .map(|place| place.id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4, "pages of one window cover the sample once");

    let again = harness.service.explore(sampled(1)).await.expect("page one again");
    assert!(again.cached);
    assert_eq!(again.items, first.items);
}

#[rstest]
#[tokio::test]
async fn capped_sources_keep_their_best_rated_places() {
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).single().expect("valid instant"),
    ));
    let created = |day| Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0).single().expect("valid instant");
    let curated = vec![
        PlaceBuilder::new("c-old-favourite", "Bạch Dinh", SourceKind::Curated)
            .city("Vũng Tàu")
            .rated(4.9, 3000)
            .created(created(1))
            .build(),
        PlaceBuilder::new("c-middle", "Hải Đăng Vũng Tàu", SourceKind::Curated)
            .city("Vũng Tàu")
            .rated(4.2, 800)
            .created(created(10))
            .build(),
        PlaceBuilder::new("c-newest", "Bãi Sau", SourceKind::Curated)
            .city("Vũng Tàu")
            .rated(3.8, 150)
            .created(created(20))
            .build(),
    ];
    let service = DiscoveryService::new(
        DiscoverySources {
            curated: Arc::new(FixturePlaceSource::new(SourceKind::Curated, curated)),
            partner: Arc::new(FixturePlaceSource::empty(SourceKind::Partner)),
            live: Arc::new(FixturePlaceSource::empty(SourceKind::Live)),
        },
        JsonCache::new(
            Arc::new(InMemoryTtlCache::new(clock.clone())),
            EXPLORE_TTL,
            "explore",
        ),
        clock,
        DiscoveryConfig {
            fetch_limit: 2,
            ..DiscoveryConfig::default()
        },
    );

    let page = service
        .explore(ExploreQuery {
            page: PageRequest::new(1, 10),
            city: Some("Vũng Tàu".to_owned()),
            sort: SortMode::Rating,
            ..ExploreQuery::default()
        })
        .await
        .expect("explore succeeds");

    let ids: Vec<_> = page.items.iter().map(|place| place.id.as_str()).collect();
    assert_eq!(ids, vec!["c-old-favourite", "c-middle"]);
    assert_eq!(page.counts.places, 3);
}
