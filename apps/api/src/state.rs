use moonlight_application::ArticleService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub article_service: ArticleService,
    /// Present when articles are stored in Postgres; used by the health check.
    pub postgres_pool: Option<PgPool>,
    pub editor_api_token: String,
}
