//! PostgreSQL persistence adapters for the curated and partner stores.
//!
//! Adapters are thin translators between Diesel rows and domain records.
//! They contain no ranking or deduplication logic.

mod diesel_helpers;
mod diesel_place_source;
mod models;
mod pool;
mod schema;

pub use diesel_place_source::{DEFAULT_FETCH_LIMIT, DieselPlaceSource};
pub use pool::{DbPool, PoolConfig, PoolError};
