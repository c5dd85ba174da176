//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use quire_core::domain::{NewPost, Post, PostPage, PostQuery, User};
use quire_core::error::RepoError;
use quire_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

const LIKE_ESCAPE: char = '\\';

/// Substring pattern for a lower-cased `LIKE`; `%` and `_` in the term match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) if local.chars().count() > 1 => {
                let first: String = local.chars().take(1).collect();
                format!("{first}***@{domain}")
            }
            Some((_, domain)) => format!("***@{domain}"),
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(User::normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_owned(&self, id: i64, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_by_owner(&self, user_id: Uuid, query: &PostQuery) -> Result<PostPage, RepoError> {
        let mut select = PostEntity::find().filter(post::Column::UserId.eq(user_id));

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                            .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Content)))
                            .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
                    ),
            );
        }

        let paginator = select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, query.per_page);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(query.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(PostPage {
            posts: models.into_iter().map(Into::into).collect(),
            total,
            page: query.page,
            per_page: query.per_page,
        })
    }
}
