//! Shared helpers for the Diesel place adapters.

use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::PlaceSourceError;

/// Map a pool failure onto the port's connection error.
pub(crate) fn map_pool_error(error: PoolError) -> PlaceSourceError {
    PlaceSourceError::connection(error.into_message())
}

/// Map a Diesel failure onto the port error, logging the driver detail.
///
/// Driver messages can echo query parameters, so only a fixed summary
/// reaches the port error.
pub(crate) fn map_diesel_error(error: diesel::result::Error, table: &str) -> PlaceSourceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, table, message = info.message(), "diesel operation failed");
        }
        _ => debug!(table, error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PlaceSourceError::connection(format!("{table}: database connection error"))
        }
        DieselError::QueryBuilderError(_) => {
            PlaceSourceError::query(format!("{table}: database query error"))
        }
        _ => PlaceSourceError::query(format!("{table}: database error")),
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Convert a record cap into a SQL `LIMIT`.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
