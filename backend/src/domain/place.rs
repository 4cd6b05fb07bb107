//! Source-agnostic place record and its value types.
//!
//! Every source adapter normalises its native rows into [`PlaceRecord`]. The
//! discovery pipeline never persists records; they live for one request or
//! one cache window.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// WGS84 coordinate pair.
///
/// ## Invariants
/// - `-90 <= latitude <= 90`.
/// - `-180 <= longitude <= 180`.
/// - Both components are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesDto", into = "CoordinatesDto")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

/// Validation errors raised by [`Coordinates::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinatesValidationError {
    /// A component is NaN or infinite.
    #[error("coordinates must be finite")]
    NotFinite,
    /// Latitude lies outside `[-90, 90]`.
    #[error("latitude {0} must be within [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude lies outside `[-180, 180]`.
    #[error("longitude {0} must be within [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Coordinates {
    /// Validate and build a coordinate pair.
    ///
    /// ```
    /// use waypoint::domain::Coordinates;
    ///
    /// assert!(Coordinates::try_new(10.346, 107.084).is_ok());
    /// assert!(Coordinates::try_new(91.0, 0.0).is_err());
    /// ```
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinatesValidationError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build coordinates from optional components, discarding invalid pairs.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::try_new(lat, lng).ok(),
            _ => None,
        }
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Serialize, Deserialize)]
struct CoordinatesDto {
    lat: f64,
    lng: f64,
}

impl From<Coordinates> for CoordinatesDto {
    fn from(value: Coordinates) -> Self {
        Self {
            lat: value.latitude,
            lng: value.longitude,
        }
    }
}

impl TryFrom<CoordinatesDto> for Coordinates {
    type Error = CoordinatesValidationError;

    fn try_from(value: CoordinatesDto) -> Result<Self, Self::Error> {
        Self::try_new(value.lat, value.lng)
    }
}

/// Closed set of place categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    /// Restaurants and eateries.
    Restaurant,
    /// Cafes and coffee shops.
    Cafe,
    /// Hotels, hostels, and other lodging.
    Hotel,
    /// Sights, landmarks, museums, parks.
    Attraction,
    /// Markets, malls, and shops.
    Shopping,
    /// Bars, pubs, and clubs.
    Nightlife,
    /// Spas, cinemas, and other leisure venues.
    Entertainment,
    /// Anything not covered above.
    Other,
}

impl PlaceCategory {
    /// Every category, in declaration order.
    pub const ALL: [PlaceCategory; 8] = [
        Self::Restaurant,
        Self::Cafe,
        Self::Hotel,
        Self::Attraction,
        Self::Shopping,
        Self::Nightlife,
        Self::Entertainment,
        Self::Other,
    ];

    /// Stable lowercase identifier used in storage and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Hotel => "hotel",
            Self::Attraction => "attraction",
            Self::Shopping => "shopping",
            Self::Nightlife => "nightlife",
            Self::Entertainment => "entertainment",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown place category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for PlaceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Average rating and number of ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Mean score on a zero to five scale.
    pub average: f64,
    /// Number of ratings contributing to the mean.
    pub count: u32,
}

/// Photo rendered at three widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Thumbnail rendition.
    pub small_url: String,
    /// List-card rendition.
    pub medium_url: String,
    /// Detail-view rendition.
    pub large_url: String,
}

impl Photo {
    /// Photo where every rendition points at the same URL.
    pub fn uniform(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            small_url: url.clone(),
            medium_url: url.clone(),
            large_url: url,
        }
    }
}

/// Backing store a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Priority placement store. Wins de-duplication ties.
    Partner,
    /// Curated catalogue.
    Curated,
    /// Live third-party maps provider.
    Live,
}

impl SourceKind {
    /// Lower values win de-duplication ties.
    pub fn priority(self) -> u8 {
        match self {
            Self::Partner => 0,
            Self::Curated => 1,
            Self::Live => 2,
        }
    }

    /// Label used in logs and per-source counts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Partner => "partners",
            Self::Curated => "places",
            Self::Live => "google",
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// Source the record was read from.
    pub source: SourceKind,
    /// Whether the place has paid priority placement.
    pub is_partner: bool,
}

impl From<SourceKind> for Provenance {
    fn from(source: SourceKind) -> Self {
        Self {
            source,
            is_partner: matches!(source, SourceKind::Partner),
        }
    }
}

/// Normalised, source-agnostic place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    /// Identifier within the originating source.
    pub id: String,
    /// Maps-provider place identifier, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_place_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Street address or vicinity.
    pub address: String,
    /// City the place belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Category.
    pub category: PlaceCategory,
    /// Location, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Rating summary, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Photos in display order.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Origin of the record.
    #[serde(flatten)]
    pub provenance: Provenance,
    /// Insertion time in the originating store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Opaque source payload kept for enrichment fallbacks.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl PlaceRecord {
    /// Minimal record with empty optional fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: PlaceCategory,
        source: SourceKind,
    ) -> Self {
        Self {
            id: id.into(),
            provider_place_id: None,
            name: name.into(),
            address: String::new(),
            city: None,
            category,
            coordinates: None,
            rating: None,
            photos: Vec::new(),
            tags: BTreeSet::new(),
            provenance: Provenance::from(source),
            created_at: None,
            raw: Value::Null,
        }
    }

    /// Source the record was read from.
    pub fn source(&self) -> SourceKind {
        self.provenance.source
    }

    /// Rating average, zero when unrated.
    pub fn rating_average(&self) -> f64 {
        self.rating.map_or(0.0, |rating| rating.average)
    }

    /// Rating count, zero when unrated.
    pub fn rating_count(&self) -> u32 {
        self.rating.map_or(0, |rating| rating.count)
    }
}
