//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob_store;
mod cache;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use blob_store::BlobStore;
pub use cache::{Cache, CacheError};
pub use repository::{BaseRepository, PostRepository, UserRepository};
