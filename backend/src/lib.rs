//! Waypoint place discovery backend.
//!
//! Hexagonal layout: [`domain`] owns the place model, the discovery and
//! geocoding pipelines, and the ports; [`inbound`] exposes them over HTTP;
//! [`outbound`] implements the ports against PostgreSQL, Redis, and the maps
//! web services.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
