//! Reqwest-backed maps provider adapter.
//!
//! This adapter owns transport details only: query-string construction,
//! timeout and HTTP error mapping, provider status mapping, and JSON decoding
//! into the port's value types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    DetailsResponseDto, GeocodeResponseDto, NearbyResponseDto, PhotoUrls, type_for_category,
};
use crate::domain::ports::{
    GeocodeHit, GeocodeProvider, GeocodeProviderError, NearbyPlace, NearbySearchRequest,
    PlaceDetails,
};

/// Web-service root used when no override is configured.
pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
const DEFAULT_MAX_PHOTOS: usize = 10;
const DETAILS_FIELDS: &str = "formatted_address,rating,user_ratings_total,photos";

/// Connection settings for [`GoogleMapsProvider`].
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    /// Web-service root; endpoint paths are joined onto it.
    pub base_url: Url,
    /// API key sent with every request.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Cap on photos returned by place details.
    pub max_photos: usize,
}

impl GoogleMapsConfig {
    /// Settings for the public endpoint with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if the built-in base URL is malformed.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_MAPS_BASE_URL)?,
            api_key: api_key.into(),
            timeout,
            max_photos: DEFAULT_MAX_PHOTOS,
        })
    }
}

/// Maps provider adapter that performs HTTP GET requests against the
/// geocoding and places web services.
pub struct GoogleMapsProvider {
    client: Client,
    geocode_endpoint: Url,
    nearby_endpoint: Url,
    details_endpoint: Url,
    photo_endpoint: Url,
    api_key: String,
    max_photos: usize,
}

/// Failure to construct a [`GoogleMapsProvider`].
#[derive(Debug, thiserror::Error)]
pub enum GoogleMapsSetupError {
    /// Base URL cannot serve as a root for endpoint paths.
    #[error("invalid maps base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// HTTP client could not be built.
    #[error("failed to build maps http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl GoogleMapsProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot be joined with endpoint
    /// paths or the reqwest client cannot be constructed.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, GoogleMapsSetupError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let root = directory_url(&config.base_url)?;
        Ok(Self {
            client,
            geocode_endpoint: root.join("geocode/json")?,
            nearby_endpoint: root.join("place/nearbysearch/json")?,
            details_endpoint: root.join("place/details/json")?,
            photo_endpoint: root.join("place/photo")?,
            api_key: config.api_key,
            max_photos: config.max_photos,
        })
    }

    fn photo_urls(&self) -> PhotoUrls<'_> {
        PhotoUrls {
            endpoint: &self.photo_endpoint,
            api_key: &self.api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        params: &[(&str, String)],
    ) -> Result<T, GeocodeProviderError> {
        let response = self
            .client
            .get(endpoint.clone())
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(endpoint = %endpoint.path(), bytes = body.len(), "maps provider responded");
        decode(body.as_ref())
    }
}

#[async_trait]
impl GeocodeProvider for GoogleMapsProvider {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeProviderError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(GeocodeProviderError::invalid_request(
                "address must not be blank",
            ));
        }
        let response: GeocodeResponseDto = self
            .get_json(&self.geocode_endpoint, &[("address", trimmed.to_owned())])
            .await?;
        response.into_hit()
    }

    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<Vec<NearbyPlace>, GeocodeProviderError> {
        let response: NearbyResponseDto = self
            .get_json(&self.nearby_endpoint, &nearby_params(request))
            .await?;
        response.into_places(&self.photo_urls())
    }

    async fn place_details(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceDetails>, GeocodeProviderError> {
        let response: DetailsResponseDto = self
            .get_json(
                &self.details_endpoint,
                &[
                    ("place_id", place_id.to_owned()),
                    ("fields", DETAILS_FIELDS.to_owned()),
                ],
            )
            .await?;
        response.into_details(&self.photo_urls(), self.max_photos)
    }
}

fn nearby_params(request: &NearbySearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        (
            "location",
            format!(
                "{},{}",
                request.center.latitude(),
                request.center.longitude()
            ),
        ),
        ("radius", request.radius_m.max(1).to_string()),
    ];
    if let Some(keyword) = request
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
    {
        params.push(("keyword", keyword.to_owned()));
    }
    if let Some(kind) = request.category.and_then(type_for_category) {
        params.push(("type", kind.to_owned()));
    }
    params
}

/// Ensure `base` ends in a slash so relative joins append rather than replace.
fn directory_url(base: &Url) -> Result<Url, url::ParseError> {
    if base.path().ends_with('/') {
        Ok(base.clone())
    } else {
        Url::parse(&format!("{}/", base.as_str()))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GeocodeProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        GeocodeProviderError::decode(format!("invalid maps JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> GeocodeProviderError {
    // reqwest errors embed the request URL, which carries the API key.
    let error = error.without_url();
    if error.is_timeout() {
        GeocodeProviderError::timeout(error.to_string())
    } else {
        GeocodeProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GeocodeProviderError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => GeocodeProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeocodeProviderError::timeout(message)
        }
        _ if status.is_client_error() => GeocodeProviderError::invalid_request(message),
        _ => GeocodeProviderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
