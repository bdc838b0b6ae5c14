use std::sync::Arc;

use moonlight_core::{AppError, AppResult, EditorIdentity};
use moonlight_domain::{
    Article, ArticleChanges, ArticleDraft, ArticleId, ArticleStatus, WorkflowLogEntry,
};

use crate::article_ports::{
    ArticleRepository, Clock, PublishedArticleListInput, PublishedArticleQuery,
};

mod editorial;
mod public_site;

/// Outcome of publishing every pending article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPendingOutcome {
    /// Articles moved to published, ordered by id.
    pub published: Vec<Article>,
    /// Articles that could not be published, with the failure message.
    pub failed: Vec<(ArticleId, String)>,
}

/// Application service for the article workflow store.
#[derive(Clone)]
pub struct ArticleService {
    repository: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl ArticleService {
    /// Creates a service from a repository and a clock.
    #[must_use]
    pub fn new(repository: Arc<dyn ArticleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Returns one article by id.
    pub async fn get_article(&self, article_id: ArticleId) -> AppResult<Article> {
        self.repository
            .find_article(article_id)
            .await?
            .ok_or_else(|| article_not_found(article_id))
    }
}

fn article_not_found(article_id: ArticleId) -> AppError {
    AppError::NotFound(format!("article '{article_id}' does not exist"))
}
