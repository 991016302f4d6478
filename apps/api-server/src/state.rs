//! Application state - shared across all handlers.

use std::sync::Arc;

use agora_core::access::AccessPolicy;
use agora_core::locator::AttachmentLocator;
use agora_core::ports::{CategoryRepository, PostRepository, UserRepository};
use agora_core::service::{CategoryService, PostService};
use agora_infra::memory::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use agora_infra::database::{
    DatabasePool, PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub locator: Arc<AttachmentLocator>,
    /// `"postgres"` or `"memory"`.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when the
    /// database is not configured or unreachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabasePool::init(db_config).await {
                    Ok(pool) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::assemble(
                            config,
                            Arc::new(PostgresUserRepository::new(pool.main.clone())),
                            Arc::new(PostgresPostRepository::new(pool.main.clone())),
                            Arc::new(PostgresCategoryRepository::new(pool.main)),
                            "postgres",
                        );
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
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL set but the postgres feature is disabled - ignoring it");
        }

        tracing::info!("Application state initialized (memory)");
        Self::in_memory(config)
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryCategoryRepository::new()),
            "memory",
        )
    }

    fn assemble(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        storage: &'static str,
    ) -> Self {
        let policy = AccessPolicy::new(config.create_policy);

        Self {
            users,
            posts: Arc::new(PostService::new(posts, categories.clone(), policy)),
            categories: Arc::new(CategoryService::new(categories)),
            locator: Arc::new(AttachmentLocator::new(
                config.attachment_origin.clone(),
                config.media_origin.clone(),
            )),
            storage,
        }
    }
}
