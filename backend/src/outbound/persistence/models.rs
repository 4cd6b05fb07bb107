//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; rows are converted into
//! [`PlaceRecord`] before they reach the domain.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::debug;
use uuid::Uuid;

use super::schema::{partner_places, places};
use crate::domain::{Coordinates, Photo, PlaceCategory, PlaceRecord, Provenance, Rating, SourceKind};

/// Row read from the curated `places` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaceRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub category: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating_average: Option<f64>,
    pub rating_count: i32,
    pub photo_urls: Vec<String>,
    pub tags: Vec<String>,
    pub provider_place_id: Option<String>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Row read from the `partner_places` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = partner_places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PartnerPlaceRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub category: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating_average: Option<f64>,
    pub rating_count: i32,
    pub photo_urls: Vec<String>,
    pub tags: Vec<String>,
    pub provider_place_id: Option<String>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<PartnerPlaceRow> for PlaceRow {
    fn from(row: PartnerPlaceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            category: row.category,
            description: row.description,
            latitude: row.latitude,
            longitude: row.longitude,
            rating_average: row.rating_average,
            rating_count: row.rating_count,
            photo_urls: row.photo_urls,
            tags: row.tags,
            provider_place_id: row.provider_place_id,
            details: row.details,
            created_at: row.created_at,
        }
    }
}

impl PlaceRow {
    /// Normalise the row into a domain record tagged with `source`.
    ///
    /// Unknown categories degrade to [`PlaceCategory::Other`]; out-of-range
    /// coordinates are dropped rather than failing the whole page.
    pub(crate) fn into_record(self, source: SourceKind) -> PlaceRecord {
        let category = self.category.parse().unwrap_or_else(|_| {
            debug!(id = %self.id, category = %self.category, "unknown stored category");
            PlaceCategory::Other
        });
        let rating = self.rating_average.map(|average| Rating {
            average,
            count: u32::try_from(self.rating_count).unwrap_or(0),
        });
        let city = Some(self.city).filter(|city| !city.trim().is_empty());
        let mut raw = self.details;
        if let Some(object) = raw
            .as_object_mut()
            .filter(|_| !self.description.is_empty())
        {
            object
                .entry("description")
                .or_insert(serde_json::Value::String(self.description));
        }
        PlaceRecord {
            id: self.id.to_string(),
            provider_place_id: self.provider_place_id,
            name: self.name,
            address: self.address,
            city,
            category,
            coordinates: Coordinates::from_parts(self.latitude, self.longitude),
            rating,
            photos: self.photo_urls.into_iter().map(Photo::uniform).collect(),
            tags: self.tags.into_iter().collect::<BTreeSet<_>>(),
            provenance: Provenance::from(source),
            created_at: Some(self.created_at),
            raw,
        }
    }
}
