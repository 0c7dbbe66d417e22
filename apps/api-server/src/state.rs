//! Application state - shared across all handlers.

use std::sync::Arc;

use wayfarer_core::PostService;
use wayfarer_core::ports::PostRepository;
use wayfarer_infra::InMemoryPostRepository;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use migration::{DbErr, Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use wayfarer_infra::database::DatabaseConfig;
#[cfg(feature = "postgres")]
use wayfarer_infra::{DatabaseConnections, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub max_page_limit: Option<u64>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repo = Self::post_repository(config).await;
        tracing::info!("Application state initialized");
        Self::with_repository(repo, config.max_page_limit)
    }

    pub fn with_repository(repo: Arc<dyn PostRepository>, max_page_limit: Option<u64>) -> Self {
        Self {
            posts: PostService::new(repo),
            max_page_limit,
        }
    }

    #[cfg(feature = "postgres")]
    async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryPostRepository::new());
        };

        or_in_memory(Self::postgres_repository(db_config, config.run_migrations).await)
    }

    /// Connect and, when asked, bring the schema up to date.
    #[cfg(feature = "postgres")]
    async fn postgres_repository(
        db_config: &DatabaseConfig,
        run_migrations: bool,
    ) -> Result<Arc<dyn PostRepository>, DbErr> {
        let connections = DatabaseConnections::init(db_config).await?;

        if run_migrations {
            Migrator::up(&connections.main, None).await?;
            tracing::info!("Migrations applied");
        }

        Ok(Arc::new(PostgresPostRepository::new(connections.main)))
    }

    #[cfg(not(feature = "postgres"))]
    async fn post_repository(_config: &AppConfig) -> Arc<dyn PostRepository> {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Arc::new(InMemoryPostRepository::new())
    }
}

/// Serve from the in-memory store when PostgreSQL cannot be used as-is.
#[cfg(feature = "postgres")]
fn or_in_memory(result: Result<Arc<dyn PostRepository>, DbErr>) -> Arc<dyn PostRepository> {
    result.unwrap_or_else(|e| {
        tracing::error!("PostgreSQL unavailable: {}. Using in-memory fallback.", e);
        Arc::new(InMemoryPostRepository::new())
    })
}

#[cfg(all(test, feature = "postgres"))]
mod tests {
    use super::*;
    use wayfarer_core::domain::PostQuery;

    #[actix_web::test]
    async fn test_failed_migration_serves_from_memory() {
        let repo = or_in_memory(Err(DbErr::Migration("relation \"posts\" missing".into())));
        let state = AppState::with_repository(repo, None);

        let listing = state.posts.list(&PostQuery::default()).await.unwrap();

        assert!(listing.posts.is_empty());
        assert_eq!(listing.total_posts, 0);
    }
}
