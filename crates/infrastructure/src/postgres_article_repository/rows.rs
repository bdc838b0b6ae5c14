use chrono::{DateTime, Utc};
use moonlight_core::{AppError, AppResult};
use moonlight_domain::{
    Article, ArticleId, ArticleImage, ArticleRecord, Provenance, ReviewMetadata, SeoMetadata,
    WorkflowLogEntry,
};
use sqlx::FromRow;

/// Column list shared by every article query.
pub(super) const ARTICLE_COLUMNS: &str = "id, title, slug, body, excerpt, category, tags, \
     status, featured_image_url, featured_image_alt, secondary_image_url, secondary_image_alt, \
     meta_title, meta_description, author, generation_source, ai_model, generation_prompt, \
     reviewer, review_notes, revision_count, view_count, last_viewed_at, created_at, \
     updated_at, published_at";

#[derive(Debug, FromRow)]
pub(super) struct ArticleRow {
    id: i64,
    title: String,
    slug: String,
    body: String,
    excerpt: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    status: String,
    featured_image_url: Option<String>,
    featured_image_alt: Option<String>,
    secondary_image_url: Option<String>,
    secondary_image_alt: Option<String>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    author: Option<String>,
    generation_source: String,
    ai_model: Option<String>,
    generation_prompt: Option<String>,
    reviewer: Option<String>,
    review_notes: Option<String>,
    revision_count: i32,
    view_count: i64,
    last_viewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = AppError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Article::restore(ArticleRecord {
            id: ArticleId::new(id)?,
            title: row.title,
            slug: row.slug,
            body: row.body,
            excerpt: row.excerpt,
            category: row.category,
            tags: row.tags,
            status: row.status.parse()?,
            featured_image: image_from_columns(row.featured_image_url, row.featured_image_alt)?,
            secondary_image: image_from_columns(row.secondary_image_url, row.secondary_image_alt)?,
            seo: SeoMetadata {
                meta_title: row.meta_title,
                meta_description: row.meta_description,
            },
            provenance: Provenance {
                author: row.author,
                generation_source: row.generation_source.parse()?,
                ai_model: row.ai_model,
                generation_prompt: row.generation_prompt,
            },
            review: ReviewMetadata {
                reviewer: row.reviewer,
                review_notes: row.review_notes,
            },
            revision_count: row.revision_count,
            view_count: row.view_count,
            last_viewed_at: row.last_viewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
        })
        .map_err(|error| AppError::Internal(format!("stored article {id} is invalid: {error}")))
    }
}

fn image_from_columns(
    url: Option<String>,
    alt_text: Option<String>,
) -> AppResult<Option<ArticleImage>> {
    url.map(|url| ArticleImage::new(url, alt_text)).transpose()
}

pub(super) fn articles_from_rows(rows: Vec<ArticleRow>) -> AppResult<Vec<Article>> {
    rows.into_iter().map(Article::try_from).collect()
}

#[derive(Debug, FromRow)]
pub(super) struct WorkflowLogRow {
    id: i64,
    article_id: i64,
    action: String,
    old_status: Option<String>,
    new_status: Option<String>,
    changed_by: String,
    change_notes: Option<String>,
    changed_at: DateTime<Utc>,
}

impl TryFrom<WorkflowLogRow> for WorkflowLogEntry {
    type Error = AppError;

    fn try_from(row: WorkflowLogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            article_id: ArticleId::new(row.article_id)?,
            action: row.action.parse()?,
            old_status: row.old_status.map(|status| status.parse()).transpose()?,
            new_status: row.new_status.map(|status| status.parse()).transpose()?,
            changed_by: row.changed_by,
            change_notes: row.change_notes,
            changed_at: row.changed_at,
        })
    }
}
