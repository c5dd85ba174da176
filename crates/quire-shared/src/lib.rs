//! # Quire Shared
//!
//! Wire types shared between the API server and the client crate.

pub mod dto;
pub mod page;
pub mod pagination;
pub mod response;

pub use page::{Flash, PageView};
pub use pagination::{PageLink, Paginated};
pub use response::{ErrorResponse, FieldErrors};
