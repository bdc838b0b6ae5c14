use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use moonlight_core::{AppError, EditorIdentity};
use moonlight_domain::{ArticleChanges, ArticleDraft, ArticleId};
use tracing::{info, warn};

use crate::dto::{
    ArticleResponse, CreateArticleRequest, PublishPendingResponse, PublishedArticleListQuery,
    UpdateArticleRequest, WorkflowLogEntryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod editorial;
mod public_site;

/// Ids outside the storage range cannot name an article.
fn article_id_from_path(value: i64) -> Result<ArticleId, AppError> {
    ArticleId::new(value)
        .map_err(|_| AppError::NotFound(format!("article '{value}' does not exist")))
}

pub use editorial::{
    create_article_handler, delete_article_handler, get_article_handler,
    list_review_queue_handler, list_workflow_log_handler, publish_pending_handler,
    update_article_handler,
};
pub use public_site::{
    get_published_article_handler, list_published_articles_handler, record_view_handler,
};

#[cfg(test)]
mod tests;
