use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moonlight_core::{AppError, AppResult};
use moonlight_domain::{
    Article, ArticleChanges, ArticleId, ArticleStatus, ValidatedDraft, WorkflowLogEntry,
};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PUBLISHED_PAGE_SIZE: usize = 10;

/// Source of the current time for every workflow timestamp.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Unvalidated published listing request as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedArticleListInput {
    /// Requested page size.
    pub limit: Option<i64>,
    /// Requested row offset.
    pub offset: Option<i64>,
    /// Optional exact category filter.
    pub category: Option<String>,
    /// Optional tag the article must carry.
    pub tag: Option<String>,
}

/// Validated published listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArticleQuery {
    /// Page size.
    pub limit: usize,
    /// Row offset.
    pub offset: usize,
    /// Optional exact category filter.
    pub category: Option<String>,
    /// Optional tag the article must carry.
    pub tag: Option<String>,
}

impl TryFrom<PublishedArticleListInput> for PublishedArticleQuery {
    type Error = AppError;

    fn try_from(value: PublishedArticleListInput) -> Result<Self, Self::Error> {
        let limit = non_negative("limit", value.limit)?.unwrap_or(DEFAULT_PUBLISHED_PAGE_SIZE);
        let offset = non_negative("offset", value.offset)?.unwrap_or(0);

        Ok(Self {
            limit,
            offset,
            category: moonlight_core::normalize_optional_text(value.category),
            tag: moonlight_core::normalize_optional_text(value.tag),
        })
    }
}

fn non_negative(name: &str, value: Option<i64>) -> AppResult<Option<usize>> {
    value
        .map(|value| {
            usize::try_from(value).map_err(|_| {
                AppError::Validation(format!("{name} must not be negative, got {value}"))
            })
        })
        .transpose()
}

/// Repository port for articles and their workflow log.
///
/// Every write applies the article mutation and its workflow log rows
/// atomically. Writes to one article are serialized; writes to different
/// articles do not wait on each other.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Assigns an id, inserts the article and appends its `created` entry.
    async fn insert_article(
        &self,
        draft: ValidatedDraft,
        changed_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Article>;

    /// Applies changes under the article's write lock and appends the derived entries.
    async fn update_article(
        &self,
        article_id: ArticleId,
        changes: ArticleChanges,
        changed_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Article>;

    /// Counts one view without touching the workflow log.
    async fn record_view(&self, article_id: ArticleId, now: DateTime<Utc>) -> AppResult<Article>;

    /// Returns one article by id.
    async fn find_article(&self, article_id: ArticleId) -> AppResult<Option<Article>>;

    /// Returns one article by slug.
    async fn find_article_by_slug(&self, slug: &str) -> AppResult<Option<Article>>;

    /// Lists draft and pending articles in review priority order.
    async fn list_review_queue(&self) -> AppResult<Vec<Article>>;

    /// Lists one page of published articles, most recently published first.
    async fn list_published(&self, query: PublishedArticleQuery) -> AppResult<Vec<Article>>;

    /// Lists ids of articles currently in the given status, ascending.
    async fn list_article_ids_with_status(
        &self,
        status: ArticleStatus,
    ) -> AppResult<Vec<ArticleId>>;

    /// Lists workflow log entries of one article in append order.
    async fn list_workflow_log(&self, article_id: ArticleId)
    -> AppResult<Vec<WorkflowLogEntry>>;

    /// Deletes an article together with its workflow log.
    async fn delete_article(&self, article_id: ArticleId) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PUBLISHED_PAGE_SIZE, PublishedArticleListInput, PublishedArticleQuery};

    #[test]
    fn published_query_applies_defaults() {
        let query = PublishedArticleQuery::try_from(PublishedArticleListInput::default());
        assert_eq!(
            query.ok(),
            Some(PublishedArticleQuery {
                limit: DEFAULT_PUBLISHED_PAGE_SIZE,
                offset: 0,
                category: None,
                tag: None,
            })
        );
    }

    #[test]
    fn published_query_rejects_negative_values() {
        let negative_limit = PublishedArticleQuery::try_from(PublishedArticleListInput {
            limit: Some(-1),
            ..PublishedArticleListInput::default()
        });
        assert!(negative_limit.is_err());

        let negative_offset = PublishedArticleQuery::try_from(PublishedArticleListInput {
            offset: Some(-10),
            ..PublishedArticleListInput::default()
        });
        assert!(negative_offset.is_err());
    }

    #[test]
    fn published_query_keeps_large_limits_and_blank_filters_are_dropped() {
        let query = PublishedArticleQuery::try_from(PublishedArticleListInput {
            limit: Some(5_000),
            offset: Some(0),
            category: Some("  ".to_owned()),
            tag: Some(" ai ".to_owned()),
        });
        assert_eq!(
            query.ok(),
            Some(PublishedArticleQuery {
                limit: 5_000,
                offset: 0,
                category: None,
                tag: Some("ai".to_owned()),
            })
        );
    }
}
