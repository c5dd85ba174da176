//! Application services - workflows composed from the ports.

mod posts;

pub use posts::{IMAGE_NAMESPACE, PER_PAGE, PostService};
