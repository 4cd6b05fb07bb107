//! Shared cache-control policies for HTTP handlers.

/// Discovery pages may be reused briefly by shared caches.
pub const PUBLIC_SHORT_LIVED: &str = "public, max-age=60";

/// Location-specific responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

/// Responses derived from a request body are never stored.
pub const NO_STORE: &str = "no-store";

/// Header tuple for cacheable discovery pages.
pub const fn public_short_lived_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_SHORT_LIVED)
}

/// Header tuple for location-specific responses.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE)
}

/// Header tuple for responses that must not be stored.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
