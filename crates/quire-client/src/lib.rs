//! # Quire Client
//!
//! The client half of the post pages: an HTTP client for the post endpoints,
//! the create/edit form state machine, the listing view with its debounced
//! search, and the debouncer itself.

pub mod api;
pub mod debounce;
pub mod form;
pub mod listing;

pub use api::{ClientError, ImageFile, PostDraft, PostsClient, SubmitOutcome};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use form::{FormState, FormTarget, PostForm};
pub use listing::{HistoryMode, ListView, PageSource, SearchController, Visit};
