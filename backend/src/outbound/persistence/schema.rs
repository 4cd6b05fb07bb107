//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. `diesel
//! print-schema` regenerates them from a live database.

diesel::table! {
    /// Curated place catalogue.
    places (id) {
        id -> Uuid,
        name -> Text,
        address -> Text,
        city -> Text,
        category -> Text,
        description -> Text,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        rating_average -> Nullable<Float8>,
        rating_count -> Int4,
        photo_urls -> Array<Text>,
        tags -> Array<Text>,
        /// Maps-provider identifier, used to collapse duplicates across sources.
        provider_place_id -> Nullable<Text>,
        is_active -> Bool,
        details -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Partner places with paid priority placement.
    partner_places (id) {
        id -> Uuid,
        name -> Text,
        address -> Text,
        city -> Text,
        category -> Text,
        description -> Text,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        rating_average -> Nullable<Float8>,
        rating_count -> Int4,
        photo_urls -> Array<Text>,
        tags -> Array<Text>,
        provider_place_id -> Nullable<Text>,
        is_active -> Bool,
        details -> Jsonb,
        /// Lower ranks are listed first within the partner store.
        priority_rank -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(places, partner_places);
