//! Maps provider outbound adapters.
//!
//! [`GoogleMapsProvider`] implements the `GeocodeProvider` port over the
//! geocoding and places web services; [`LivePlaceSource`] turns its proximity
//! search into a discovery source.

mod dto;
mod http_provider;
mod live_source;

pub use http_provider::{
    DEFAULT_MAPS_BASE_URL, GoogleMapsConfig, GoogleMapsProvider, GoogleMapsSetupError,
};
pub use live_source::{DEFAULT_LIVE_RADIUS_M, LivePlaceSource};
