//! Domain primitives, pipelines, and ports.
//!
//! Purpose: own the place model and the two algorithmic pipelines (federated
//! discovery and geocode resolution) independently of any transport or
//! storage. Adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - [`PlaceRecord`] and its value types: the normalised place.
//! - [`ExploreQuery`]: discovery request with its degradation rules.
//! - [`discovery`]: aggregate, de-duplicate, rank, filter, paginate.
//! - [`geocoding`]: resolver cascade, reject list, itinerary enricher.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod discovery;
pub mod error;
pub mod explore_query;
pub mod geo;
pub mod geocoding;
mod json_cache;
pub mod place;
pub mod ports;
pub mod text;
mod trace_id;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::explore_query::{
    DEFAULT_MAX_DISTANCE_KM, ExploreQuery, MAX_RATING, SortMode, SourceScope,
};
pub use self::json_cache::JsonCache;
pub use self::place::{
    Coordinates, CoordinatesValidationError, PlaceCategory, PlaceRecord, Photo, Provenance,
    Rating, SourceKind, UnknownCategory,
};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use waypoint::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::invalid_request("lat is required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
