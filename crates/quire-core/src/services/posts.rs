//! The post workflow: validation, image storage and persistence.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPage, PostQuery};
use crate::error::{DomainError, RepoError};
use crate::ports::{BlobStore, PostRepository};
use crate::validation::{ImageRule, PostInput, validate_new_post, validate_post};

/// Namespace inside the blob area that holds post images.
pub const IMAGE_NAMESPACE: &str = "posts";

/// Fixed listing page size.
pub const PER_PAGE: u64 = 10;

/// Owner-scoped post operations.
///
/// File writes are not transactional with record writes: a failure between
/// the two can leave an orphaned blob.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { posts, blobs }
    }

    pub async fn list(
        &self,
        owner: Uuid,
        search: Option<&str>,
        page: u64,
    ) -> Result<PostPage, DomainError> {
        let query = PostQuery::new(search, page, PER_PAGE);
        tracing::debug!(
            user_id = %owner,
            search = ?query.search,
            page = query.page,
            "Listing posts"
        );
        Ok(self.posts.list_by_owner(owner, &query).await?)
    }

    /// Fetch a post for editing.
    pub async fn find(&self, id: i64, owner: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_owned(id, owner)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    pub async fn create(&self, owner: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let (valid, image) = validate_new_post(input)?;

        let image_path = self
            .blobs
            .put(IMAGE_NAMESPACE, image.extension, &image.bytes)
            .await?;

        let post = self
            .posts
            .insert(NewPost::new(
                owner,
                valid.title,
                valid.content,
                valid.status,
                valid.category,
                image_path,
            ))
            .await?;

        tracing::info!(post_id = post.id, user_id = %owner, image = %post.image, "Post created");
        Ok(post)
    }

    pub async fn update(&self, id: i64, owner: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let mut post = self.find(id, owner).await?;
        let valid = validate_post(input, ImageRule::Optional)?;

        let replaced_image = match valid.image {
            Some(image) => {
                let path = self
                    .blobs
                    .put(IMAGE_NAMESPACE, image.extension, &image.bytes)
                    .await?;
                Some(std::mem::replace(&mut post.image, path))
            }
            None => None,
        };

        post.revise(valid.title, valid.content, valid.status, valid.category);
        let post = self.posts.save(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })?;

        if let Some(old) = replaced_image {
            self.blobs.delete(&old).await?;
            tracing::debug!(post_id = id, old_image = %old, "Replaced post image");
        }

        tracing::info!(post_id = id, user_id = %owner, "Post updated");
        Ok(post)
    }

    pub async fn delete(&self, id: i64, owner: Uuid) -> Result<(), DomainError> {
        let post = self.find(id, owner).await?;

        if !post.image.is_empty() {
            self.blobs.delete(&post.image).await?;
        }

        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })?;

        tracing::info!(post_id = id, user_id = %owner, "Post deleted");
        Ok(())
    }
}
