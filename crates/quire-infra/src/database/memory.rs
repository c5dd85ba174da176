//! In-memory repositories, used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quire_core::domain::{NewPost, Post, PostPage, PostQuery, User};
use quire_core::error::RepoError;
use quire_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct PostTable {
    rows: HashMap<i64, Post>,
    last_id: i64,
}

/// Post repository backed by a map; ids come from a counter like a sequence.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&entity.id) {
            Some(row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let post = post.into_post(table.last_id);
        table.rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_owned(&self, id: i64, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .get(&id)
            .filter(|post| post.user_id == user_id)
            .cloned())
    }

    async fn list_by_owner(&self, user_id: Uuid, query: &PostQuery) -> Result<PostPage, RepoError> {
        let table = self.table.read().await;

        let mut matching: Vec<&Post> = table
            .rows
            .values()
            .filter(|post| post.user_id == user_id && query.matches(post))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let posts = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page as usize)
            .cloned()
            .collect();

        Ok(PostPage {
            posts,
            total,
            page: query.page,
            per_page: query.per_page,
        })
    }
}

/// User repository backed by a map keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        match users.get_mut(&entity.id) {
            Some(row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = User::normalize_email(email);
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::domain::PostStatus;

    fn new_post(owner: Uuid, title: &str, content: &str) -> NewPost {
        NewPost::new(
            owner,
            title.to_string(),
            content.to_string(),
            PostStatus::Active,
            "Fiction".to_string(),
            "posts/a.png".to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryPostRepository::new();
        let owner = Uuid::new_v4();

        let first = repo.insert(new_post(owner, "One", "x")).await.unwrap();
        let second = repo.insert(new_post(owner, "Two", "y")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_owner_scoped() {
        let repo = InMemoryPostRepository::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        for i in 0..12 {
            repo.insert(new_post(owner, &format!("Post {i}"), "body"))
                .await
                .unwrap();
        }
        repo.insert(new_post(other, "Foreign", "body")).await.unwrap();

        let page = repo
            .list_by_owner(owner, &PostQuery::new(None, 1, 10))
            .await
            .unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.posts.len(), 10);
        assert_eq!(page.posts[0].title, "Post 11");

        let page = repo
            .list_by_owner(owner, &PostQuery::new(None, 2, 10))
            .await
            .unwrap();
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[1].title, "Post 0");
    }

    #[tokio::test]
    async fn test_find_owned_hides_foreign_posts() {
        let repo = InMemoryPostRepository::new();
        let owner = Uuid::new_v4();
        let post = repo.insert(new_post(owner, "Mine", "x")).await.unwrap();

        assert!(repo.find_owned(post.id, owner).await.unwrap().is_some());
        assert!(repo.find_owned(post.id, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_delete_missing_post() {
        let repo = InMemoryPostRepository::new();
        let post = new_post(Uuid::new_v4(), "Ghost", "x").into_post(42);

        assert!(matches!(repo.save(post).await, Err(RepoError::NotFound)));
        assert!(matches!(repo.delete(42).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("a@example.com", "hash".to_string()))
            .await
            .unwrap();

        let result = repo
            .create(User::new(" A@Example.com ", "hash".to_string()))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));

        let found = repo.find_by_email("A@EXAMPLE.COM").await.unwrap();
        assert!(found.is_some());
    }
}
