//! Builders wiring outbound adapters into the HTTP state ports.
//!
//! Each adapter falls back to an in-process implementation when its
//! infrastructure is not configured: fixture records instead of PostgreSQL,
//! an empty live source and fixture geocoder instead of the maps provider.

use std::sync::Arc;

use mockable::DefaultClock;
use serde::Deserialize;
use tracing::{info, warn};

use waypoint::domain::discovery::{DiscoveryService, DiscoverySources};
use waypoint::domain::geocoding::{
    GeocodeResolver, ItineraryEnrichmentService, PlaceEnricher, SubstringLocationMatcher,
};
use waypoint::domain::ports::{
    FixtureGeocodeProvider, FixturePlaceSource, GeocodeProvider, PlaceSource,
};
use waypoint::domain::{JsonCache, PlaceRecord, SourceKind};
use waypoint::inbound::http::state::HttpState;
use waypoint::outbound::maps::{GoogleMapsProvider, LivePlaceSource};
use waypoint::outbound::persistence::DieselPlaceSource;

use super::ServerConfig;

const FIXTURE_PLACES: &str = include_str!("../../fixtures/places.json");

/// Records served when no database is configured.
#[derive(Debug, Deserialize)]
struct FixtureCatalogue {
    curated: Vec<PlaceRecord>,
    partner: Vec<PlaceRecord>,
}

fn fixture_sources() -> std::io::Result<(Arc<dyn PlaceSource>, Arc<dyn PlaceSource>)> {
    let catalogue: FixtureCatalogue = serde_json::from_str(FIXTURE_PLACES)
        .map_err(|err| std::io::Error::other(format!("invalid fixture places: {err}")))?;
    let curated: Arc<dyn PlaceSource> = Arc::new(FixturePlaceSource::new(
        SourceKind::Curated,
        catalogue.curated,
    ));
    let partner: Arc<dyn PlaceSource> = Arc::new(FixturePlaceSource::new(
        SourceKind::Partner,
        catalogue.partner,
    ));
    Ok((curated, partner))
}

fn build_maps_provider(
    config: &ServerConfig,
) -> std::io::Result<Option<Arc<dyn GeocodeProvider>>> {
    let maps_config = config
        .settings
        .maps_config()
        .map_err(|err| std::io::Error::other(format!("invalid maps base url: {err}")))?;
    let Some(maps_config) = maps_config else {
        warn!("no maps api key configured; live discovery and geocoding disabled");
        return Ok(None);
    };
    let provider: Arc<dyn GeocodeProvider> = Arc::new(
        GoogleMapsProvider::new(maps_config)
            .map_err(|err| std::io::Error::other(err.to_string()))?,
    );
    Ok(Some(provider))
}

fn build_sources(
    config: &ServerConfig,
    maps: Option<&Arc<dyn GeocodeProvider>>,
) -> std::io::Result<DiscoverySources> {
    let fetch_limit = config.settings.discovery_config().fetch_limit;
    let (curated, partner) = match &config.db_pool {
        Some(pool) => {
            info!("serving curated and partner places from PostgreSQL");
            let curated: Arc<dyn PlaceSource> =
                Arc::new(DieselPlaceSource::curated(pool.clone(), fetch_limit));
            let partner: Arc<dyn PlaceSource> =
                Arc::new(DieselPlaceSource::partner(pool.clone(), fetch_limit));
            (curated, partner)
        }
        None => {
            warn!("no database configured; serving fixture places");
            fixture_sources()?
        }
    };
    let live: Arc<dyn PlaceSource> = match maps {
        Some(provider) => Arc::new(
            LivePlaceSource::new(
                Arc::clone(provider),
                config.settings.discovery_config().live_max_results,
            )
            .with_default_radius(config.settings.nearby_search_radius_m()),
        ),
        None => Arc::new(FixturePlaceSource::empty(SourceKind::Live)),
    };
    Ok(DiscoverySources {
        curated,
        partner,
        live,
    })
}

/// Assemble the discovery and enrichment services behind the HTTP ports.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the maps adapter cannot be configured or
/// the bundled fixture catalogue is malformed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let settings = &config.settings;
    let maps = build_maps_provider(config)?;
    let sources = build_sources(config, maps.as_ref())?;

    let discovery = DiscoveryService::new(
        sources,
        JsonCache::new(Arc::clone(&config.cache), settings.explore_cache_ttl(), "explore"),
        Arc::new(DefaultClock),
        settings.discovery_config(),
    );

    let provider: Arc<dyn GeocodeProvider> = match maps {
        Some(provider) => provider,
        None => Arc::new(FixtureGeocodeProvider),
    };
    let resolver = GeocodeResolver::new(
        provider,
        JsonCache::new(Arc::clone(&config.cache), settings.geocode_cache_ttl(), "geocode"),
        settings.reject_list(),
        settings.geocode_config(),
    );
    let enrichment = ItineraryEnrichmentService::new(
        resolver,
        PlaceEnricher::new(Arc::new(SubstringLocationMatcher))
            .with_reject_list(settings.reject_list()),
    );

    Ok(HttpState::new(Arc::new(discovery), Arc::new(enrichment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use waypoint::domain::ports::PlaceSourceQuery;
    use waypoint::settings::AppSettings;

    #[rstest]
    #[tokio::test]
    async fn fixture_catalogue_parses_and_tags_sources() {
        let (curated, partner) = fixture_sources().expect("fixture catalogue");
        let query = PlaceSourceQuery {
            city: Some("Vũng Tàu".to_owned()),
            ..PlaceSourceQuery::default()
        };

        let curated_page = curated.fetch(&query).await.expect("curated fetch");
        let partner_page = partner.fetch(&query).await.expect("partner fetch");

        assert!(!curated_page.records.is_empty());
        assert!(
            partner_page
                .records
                .iter()
                .all(|record| record.provenance.is_partner)
        );
    }

    #[rstest]
    fn state_builds_without_infrastructure() {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket addr"),
            AppSettings::default(),
        );
        assert!(build_http_state(&config).is_ok());
    }
}
