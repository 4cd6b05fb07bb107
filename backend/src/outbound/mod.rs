//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **cache**: in-process and Redis-backed TTL caches
//! - **maps**: maps web-service client and the live place source built on it
//! - **persistence**: PostgreSQL-backed curated and partner place stores
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod maps;
pub mod persistence;
