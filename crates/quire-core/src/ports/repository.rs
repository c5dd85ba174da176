use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPage, PostQuery, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist changes to an existing entity. Missing entities yield `RepoError::NotFound`.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Missing entities yield `RepoError::NotFound`.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Insert a new user. A taken email yields `RepoError::Constraint`.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. New posts go through `insert` so the store can assign the id.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Find a post only if it belongs to `user_id`.
    async fn find_owned(&self, id: i64, user_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Newest first, filtered and paginated by `query`.
    async fn list_by_owner(&self, user_id: Uuid, query: &PostQuery) -> Result<PostPage, RepoError>;
}
