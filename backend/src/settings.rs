//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `WAYPOINT_*` environment variables, and an
//! optional configuration file. Every field is optional; accessors supply
//! the fallbacks so absent infrastructure degrades to in-process adapters.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::discovery::{DEFAULT_NEARBY_RADIUS_M, DiscoveryConfig};
use crate::domain::geocoding::{AddressRejectList, GeocodeConfig};
use crate::outbound::maps::{DEFAULT_MAPS_BASE_URL, GoogleMapsConfig};
use crate::outbound::persistence::DEFAULT_FETCH_LIMIT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_EXPLORE_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_GEOCODE_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_LIVE_MAX_RESULTS: usize = 5;
const DEFAULT_GEOCODE_BATCH_SIZE: usize = 5;
const DEFAULT_MAX_DETAIL_PHOTOS: usize = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_REDIS_MAX_CONNECTIONS: u32 = 16;

/// Runtime configuration for the discovery service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WAYPOINT")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL for the curated and partner stores. Fixture sources
    /// are used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Redis URL for the shared TTL cache. An in-process cache is used when
    /// absent.
    pub redis_url: Option<String>,
    /// Maximum pooled Redis connections.
    pub redis_max_connections: Option<u32>,
    /// Maps web-service key. Live discovery and geocoding are disabled when
    /// absent.
    pub maps_api_key: Option<String>,
    /// Maps web-service root.
    pub maps_base_url: Option<String>,
    /// Per-call deadline for place sources and the maps provider.
    pub provider_timeout_secs: Option<u64>,
    /// Lifetime of cached explore pages.
    pub explore_cache_ttl_secs: Option<u64>,
    /// Lifetime of cached geocode results.
    pub geocode_cache_ttl_secs: Option<u64>,
    /// Cap on live results merged into one explore request.
    pub live_max_results: Option<usize>,
    /// Concurrent geocode resolutions per batch.
    pub geocode_batch_size: Option<usize>,
    /// Cap on rows requested from each datastore source.
    pub source_fetch_limit: Option<usize>,
    /// Comma-separated replacement for the placeholder address list.
    pub geocode_reject_list: Option<String>,
    /// Radius for live and proximity searches, in metres.
    pub nearby_search_radius_m: Option<u32>,
    /// Cap on photos kept from a place details lookup.
    pub max_detail_photos: Option<usize>,
}

impl AppSettings {
    /// Bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Database pool size.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Redis pool size.
    pub fn redis_max_connections(&self) -> u32 {
        self.redis_max_connections
            .unwrap_or(DEFAULT_REDIS_MAX_CONNECTIONS)
    }

    /// Non-blank maps API key, if configured.
    pub fn maps_api_key(&self) -> Option<&str> {
        self.maps_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Provider deadline.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider_timeout_secs
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
        )
    }

    /// Explore cache lifetime.
    pub fn explore_cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.explore_cache_ttl_secs
                .unwrap_or(DEFAULT_EXPLORE_CACHE_TTL_SECS),
        )
    }

    /// Geocode cache lifetime.
    pub fn geocode_cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.geocode_cache_ttl_secs
                .unwrap_or(DEFAULT_GEOCODE_CACHE_TTL_SECS),
        )
    }

    /// Search radius for live and proximity lookups.
    pub fn nearby_search_radius_m(&self) -> u32 {
        self.nearby_search_radius_m
            .unwrap_or(DEFAULT_NEARBY_RADIUS_M)
    }

    /// Discovery pipeline settings.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            source_timeout: self.provider_timeout(),
            fetch_limit: self.source_fetch_limit.unwrap_or(DEFAULT_FETCH_LIMIT).max(1),
            live_max_results: self.live_max_results.unwrap_or(DEFAULT_LIVE_MAX_RESULTS),
        }
    }

    /// Geocode cascade settings.
    pub fn geocode_config(&self) -> GeocodeConfig {
        GeocodeConfig {
            nearby_radius_m: self.nearby_search_radius_m(),
            max_detail_photos: self.max_detail_photos(),
            batch_size: self
                .geocode_batch_size
                .unwrap_or(DEFAULT_GEOCODE_BATCH_SIZE)
                .max(1),
            ..GeocodeConfig::default()
        }
    }

    /// Placeholder addresses never sent to the provider.
    pub fn reject_list(&self) -> AddressRejectList {
        self.geocode_reject_list
            .as_deref()
            .map_or_else(AddressRejectList::default, AddressRejectList::from_csv)
    }

    /// Maps adapter settings, or `None` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when `maps_base_url` is malformed.
    pub fn maps_config(&self) -> Result<Option<GoogleMapsConfig>, url::ParseError> {
        let Some(api_key) = self.maps_api_key() else {
            return Ok(None);
        };
        let base_url = Url::parse(
            self.maps_base_url
                .as_deref()
                .unwrap_or(DEFAULT_MAPS_BASE_URL),
        )?;
        Ok(Some(GoogleMapsConfig {
            base_url,
            api_key: api_key.to_owned(),
            timeout: self.provider_timeout(),
            max_photos: self.max_detail_photos(),
        }))
    }

    fn max_detail_photos(&self) -> usize {
        self.max_detail_photos.unwrap_or(DEFAULT_MAX_DETAIL_PHOTOS)
    }
}
