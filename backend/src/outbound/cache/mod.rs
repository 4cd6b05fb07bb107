//! TTL cache adapters backing the explore and geocode caches.
//!
//! - [`InMemoryTtlCache`] keeps entries in process; used when no Redis URL is
//!   configured and in tests.
//! - [`RedisTtlCache`] shares entries between replicas through `bb8-redis`.
//!
//! Both store opaque strings under namespaced keys (`explore:v1:<sha256>`,
//! `geocode:v1:<sha256>`); typed encoding happens in the domain.

mod memory;
mod redis;

pub use self::memory::InMemoryTtlCache;
pub use self::redis::{RedisTtlCache, connect_redis_pool};
