//! # Quire Core
//!
//! The domain layer of the Quire post service.
//! Entities, validation rules, ports and the post workflow live here; nothing
//! in this crate knows about HTTP, SQL or the filesystem.

pub mod domain;
pub mod error;
pub mod flash;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
pub use flash::FlashMessages;
pub use services::PostService;
