use std::sync::Arc;

use moonlight_application::{ArticleRepository, ArticleService};
use moonlight_core::AppError;
use moonlight_infrastructure::{InMemoryArticleRepository, PostgresArticleRepository, SystemClock};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, ArticleStoreConfig};
use crate::state::AppState;

use super::connect_and_migrate;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let (repository, postgres_pool) = build_article_repository(&config.article_store).await?;

    Ok(AppState {
        article_service: ArticleService::new(repository, Arc::new(SystemClock)),
        postgres_pool,
        editor_api_token: config.editor_api_token.clone(),
    })
}

async fn build_article_repository(
    article_store: &ArticleStoreConfig,
) -> Result<(Arc<dyn ArticleRepository>, Option<PgPool>), AppError> {
    match article_store {
        ArticleStoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = connect_and_migrate(database_url, *max_connections).await?;
            info!(max_connections = *max_connections, "article store: postgres");

            let repository: Arc<dyn ArticleRepository> =
                Arc::new(PostgresArticleRepository::new(pool.clone()));
            Ok((repository, Some(pool)))
        }
        ArticleStoreConfig::Memory => {
            warn!("article store: memory, articles are lost on restart");

            let repository: Arc<dyn ArticleRepository> = Arc::new(InMemoryArticleRepository::new());
            Ok((repository, None))
        }
    }
}
