use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;

/// Publication status of a post, persisted as a small integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Active,
    Inactive,
}

impl PostStatus {
    pub fn code(self) -> i16 {
        match self {
            PostStatus::Active => 1,
            PostStatus::Inactive => 2,
        }
    }

    /// Decode a stored code. Anything other than `1` reads as inactive,
    /// which covers rows written with the legacy `0` code.
    pub fn from_code(code: i16) -> Self {
        if code == 1 {
            PostStatus::Active
        } else {
            PostStatus::Inactive
        }
    }

    /// Parse a submitted form value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1" => Some(PostStatus::Active),
            "0" | "2" => Some(PostStatus::Inactive),
            _ => None,
        }
    }
}

/// Post entity - a blog post owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub category: String,
    /// Path of the image inside the blob area, e.g. `posts/<name>.png`.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Overwrite the editable fields, re-deriving the slug from the title.
    pub fn revise(
        &mut self,
        title: String,
        content: String,
        status: PostStatus,
        category: String,
    ) {
        self.slug = slugify(&title);
        self.title = title;
        self.content = content;
        self.status = status;
        self.category = category;
        self.updated_at = Utc::now();
    }
}

/// A post that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub category: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(
        user_id: Uuid,
        title: String,
        content: String,
        status: PostStatus,
        category: String,
        image: String,
    ) -> Self {
        Self {
            user_id,
            slug: slugify(&title),
            title,
            content,
            status,
            category,
            image,
            created_at: Utc::now(),
        }
    }

    /// Attach the id assigned by the store.
    pub fn into_post(self, id: i64) -> Post {
        Post {
            id,
            user_id: self.user_id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            status: self.status,
            category: self.category,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Listing parameters for an owner's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

impl PostQuery {
    pub fn new(search: Option<&str>, page: u64, per_page: u64) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let per_page = per_page.max(1);
        // SQL offsets are signed 64-bit.
        let last_addressable = (i64::MAX as u64) / per_page;

        Self {
            search,
            page: page.clamp(1, last_addressable.max(1)),
            per_page,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// In-process form of the search predicate, used by non-SQL stores.
    pub fn matches(&self, post: &Post) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
        }
    }
}

/// One page of an owner's posts plus the size of the whole result set.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}
