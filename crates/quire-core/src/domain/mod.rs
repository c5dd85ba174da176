//! Domain entities - the core business objects.

mod post;
mod slug;
mod user;

pub use post::{NewPost, Post, PostPage, PostQuery, PostStatus};
pub use slug::slugify;
pub use user::User;
