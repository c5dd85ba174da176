//! # Quire Infrastructure
//!
//! Concrete implementations of the ports defined in `quire-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! In-memory repositories, blob stores and the cache are always available;
//! the server falls back to them when no database is configured.

pub mod auth;
pub mod cache;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
pub use storage::{InMemoryBlobStore, LocalBlobStore};
