//! Application state - shared across all handlers.

use std::sync::Arc;

use quire_core::ports::{BlobStore, Cache, PostRepository, UserRepository};
use quire_core::{FlashMessages, PostService};
use quire_infra::cache::InMemoryCache;
use quire_infra::database::{InMemoryPostRepository, InMemoryUserRepository};
use quire_infra::storage::LocalBlobStore;

#[cfg(feature = "postgres")]
use quire_infra::database::{
    DatabaseConnections, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<dyn UserRepository>,
    pub blobs: Arc<dyn BlobStore>,
    pub flash: FlashMessages,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(&config.storage_root));
        tracing::info!(root = %config.storage_root.display(), "Blob storage ready");

        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let users = Arc::new(PostgresUserRepository::new(conn.main.clone()));
                        let posts = Arc::new(PostgresPostRepository::new(conn.main.clone()));
                        let mut state = Self::from_parts(users, posts, blobs, cache);
                        state.db = Some(conn);
                        tracing::info!("Application state initialized");
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        let state = Self::from_parts(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            blobs,
            cache,
        );
        tracing::info!("Application state initialized");
        state
    }

    /// Wire the state from already-built adapters.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        blobs: Arc<dyn BlobStore>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(posts, blobs.clone())),
            users,
            blobs,
            flash: FlashMessages::new(cache),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Whether the configured database answers.
    pub async fn database_status(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        if let Some(db) = &self.db {
            return if db.ping().await { "up" } else { "down" };
        }
        "in-memory"
    }
}
