//! DTOs for decoding maps web-service JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into the
//! port's value types in one pass. Every response carries a provider-level
//! `status` that is checked before the payload is read.

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::domain::ports::{GeocodeHit, GeocodeProviderError, NearbyPlace, PlaceDetails};
use crate::domain::{Coordinates, Photo, PlaceCategory, Rating};

/// Maximum photo widths for the small, medium, and large renditions.
pub(super) const PHOTO_WIDTHS: [u32; 3] = [200, 400, 800];

/// Provider status values shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ProviderStatus {
    Ok,
    ZeroResults,
    NotFound,
}

/// Check the provider-level status, mapping failures onto port errors.
pub(super) fn check_status(
    status: &str,
    error_message: Option<&str>,
) -> Result<ProviderStatus, GeocodeProviderError> {
    let message = || match error_message {
        Some(detail) => format!("{status}: {detail}"),
        None => status.to_owned(),
    };
    match status {
        "OK" => Ok(ProviderStatus::Ok),
        "ZERO_RESULTS" => Ok(ProviderStatus::ZeroResults),
        "NOT_FOUND" => Ok(ProviderStatus::NotFound),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => {
            Err(GeocodeProviderError::rate_limited(message()))
        }
        "REQUEST_DENIED" | "INVALID_REQUEST" => {
            Err(GeocodeProviderError::invalid_request(message()))
        }
        _ => Err(GeocodeProviderError::transport(message())),
    }
}

/// Builds photo URLs for the three renditions from a photo reference.
pub(super) struct PhotoUrls<'a> {
    pub(super) endpoint: &'a Url,
    pub(super) api_key: &'a str,
}

impl PhotoUrls<'_> {
    pub(super) fn photo(&self, reference: &str) -> Photo {
        let [small, medium, large] = PHOTO_WIDTHS.map(|width| self.url(reference, width));
        Photo {
            small_url: small,
            medium_url: medium,
            large_url: large,
        }
    }

    fn url(&self, reference: &str, width: u32) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("maxwidth", &width.to_string())
            .append_pair("photo_reference", reference)
            .append_pair("key", self.api_key);
        url.into()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LatLngDto {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeometryDto {
    pub(super) location: LatLngDto,
}

impl GeometryDto {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::try_new(self.location.lat, self.location.lng).ok()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoDto {
    pub(super) photo_reference: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) error_message: Option<String>,
    #[serde(default)]
    pub(super) results: Vec<GeocodeResultDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResultDto {
    #[serde(default)]
    pub(super) formatted_address: Option<String>,
    #[serde(default)]
    pub(super) place_id: Option<String>,
    pub(super) geometry: GeometryDto,
}

impl GeocodeResponseDto {
    pub(super) fn into_hit(self) -> Result<Option<GeocodeHit>, GeocodeProviderError> {
        match check_status(&self.status, self.error_message.as_deref())? {
            ProviderStatus::Ok => {}
            ProviderStatus::ZeroResults | ProviderStatus::NotFound => return Ok(None),
        }
        Ok(self.results.into_iter().find_map(|result| {
            let coordinates = result.geometry.coordinates()?;
            Some(GeocodeHit {
                coordinates,
                place_id: result.place_id,
                formatted_address: result.formatted_address,
            })
        }))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) error_message: Option<String>,
    #[serde(default)]
    pub(super) results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyResultDto {
    pub(super) place_id: String,
    pub(super) name: String,
    #[serde(default)]
    pub(super) vicinity: Option<String>,
    #[serde(default)]
    pub(super) geometry: Option<GeometryDto>,
    #[serde(default)]
    pub(super) rating: Option<f64>,
    #[serde(default)]
    pub(super) user_ratings_total: Option<u32>,
    #[serde(default)]
    pub(super) photos: Vec<PhotoDto>,
    #[serde(default)]
    pub(super) types: Vec<String>,
}

impl NearbyResponseDto {
    /// Decode every result, skipping entries without an id or name.
    pub(super) fn into_places(
        self,
        photos: &PhotoUrls<'_>,
    ) -> Result<Vec<NearbyPlace>, GeocodeProviderError> {
        match check_status(&self.status, self.error_message.as_deref())? {
            ProviderStatus::Ok => {}
            ProviderStatus::ZeroResults | ProviderStatus::NotFound => return Ok(Vec::new()),
        }
        Ok(self
            .results
            .into_iter()
            .filter_map(|raw| {
                let dto = serde_json::from_value::<NearbyResultDto>(raw.clone()).ok()?;
                Some(dto.into_place(raw, photos))
            })
            .collect())
    }
}

impl NearbyResultDto {
    fn into_place(self, raw: Value, photos: &PhotoUrls<'_>) -> NearbyPlace {
        NearbyPlace {
            coordinates: self.geometry.as_ref().and_then(GeometryDto::coordinates),
            rating: rating(self.rating, self.user_ratings_total),
            photos: self
                .photos
                .iter()
                .map(|photo| photos.photo(&photo.photo_reference))
                .collect(),
            category: category_from_types(&self.types),
            place_id: self.place_id,
            name: self.name,
            address: self.vicinity,
            raw,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) error_message: Option<String>,
    #[serde(default)]
    pub(super) result: Option<DetailsResultDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsResultDto {
    #[serde(default)]
    pub(super) formatted_address: Option<String>,
    #[serde(default)]
    pub(super) rating: Option<f64>,
    #[serde(default)]
    pub(super) user_ratings_total: Option<u32>,
    #[serde(default)]
    pub(super) photos: Vec<PhotoDto>,
}

impl DetailsResponseDto {
    pub(super) fn into_details(
        self,
        photos: &PhotoUrls<'_>,
        max_photos: usize,
    ) -> Result<Option<PlaceDetails>, GeocodeProviderError> {
        match check_status(&self.status, self.error_message.as_deref())? {
            ProviderStatus::Ok => {}
            ProviderStatus::ZeroResults | ProviderStatus::NotFound => return Ok(None),
        }
        Ok(self.result.map(|result| PlaceDetails {
            formatted_address: result.formatted_address,
            rating: rating(result.rating, result.user_ratings_total),
            photos: result
                .photos
                .iter()
                .take(max_photos)
                .map(|photo| photos.photo(&photo.photo_reference))
                .collect(),
        }))
    }
}

fn rating(average: Option<f64>, count: Option<u32>) -> Option<Rating> {
    average
        .filter(|value| value.is_finite())
        .map(|average| Rating {
            average,
            count: count.unwrap_or(0),
        })
}

/// Map the provider's type list onto a category, first match wins.
pub(super) fn category_from_types(types: &[String]) -> PlaceCategory {
    types
        .iter()
        .find_map(|kind| match kind.as_str() {
            "restaurant" | "food" | "meal_takeaway" | "meal_delivery" => {
                Some(PlaceCategory::Restaurant)
            }
            "cafe" | "bakery" => Some(PlaceCategory::Cafe),
            "lodging" => Some(PlaceCategory::Hotel),
            "tourist_attraction" | "museum" | "park" | "church" | "hindu_temple"
            | "place_of_worship" | "natural_feature" | "zoo" | "aquarium" => {
                Some(PlaceCategory::Attraction)
            }
            "shopping_mall" | "store" | "clothing_store" | "supermarket" | "market" => {
                Some(PlaceCategory::Shopping)
            }
            "bar" | "night_club" => Some(PlaceCategory::Nightlife),
            "spa" | "movie_theater" | "amusement_park" | "bowling_alley" | "casino" => {
                Some(PlaceCategory::Entertainment)
            }
            _ => None,
        })
        .unwrap_or(PlaceCategory::Other)
}

/// Provider type used to narrow a nearby search to `category`.
pub(super) fn type_for_category(category: PlaceCategory) -> Option<&'static str> {
    match category {
        PlaceCategory::Restaurant => Some("restaurant"),
        PlaceCategory::Cafe => Some("cafe"),
        PlaceCategory::Hotel => Some("lodging"),
        PlaceCategory::Attraction => Some("tourist_attraction"),
        PlaceCategory::Shopping => Some("shopping_mall"),
        PlaceCategory::Nightlife => Some("bar"),
        PlaceCategory::Entertainment => Some("amusement_park"),
        PlaceCategory::Other => None,
    }
}
