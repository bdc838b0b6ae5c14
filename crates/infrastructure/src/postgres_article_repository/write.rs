use chrono::{DateTime, Utc};
use moonlight_core::{AppError, AppResult};
use moonlight_domain::{Article, ArticleId, ArticleImage, WorkflowEvent};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Postgres, Transaction};

/// Binds every mutable article column after the id, in `ARTICLE_COLUMNS` order.
pub(super) fn bind_article_columns<'q>(
    query: Query<'q, Postgres, PgArguments>,
    article: &'q Article,
) -> Query<'q, Postgres, PgArguments> {
    let featured_image = article.featured_image();
    let secondary_image = article.secondary_image();

    query
        .bind(article.title())
        .bind(article.slug().as_str())
        .bind(article.body())
        .bind(article.excerpt())
        .bind(article.category())
        .bind(article.tags().to_vec())
        .bind(article.status().as_str())
        .bind(featured_image.map(ArticleImage::url))
        .bind(featured_image.and_then(ArticleImage::alt_text))
        .bind(secondary_image.map(ArticleImage::url))
        .bind(secondary_image.and_then(ArticleImage::alt_text))
        .bind(article.seo().meta_title.as_deref())
        .bind(article.seo().meta_description.as_deref())
        .bind(article.provenance().author.as_deref())
        .bind(article.provenance().generation_source.as_str())
        .bind(article.provenance().ai_model.as_deref())
        .bind(article.provenance().generation_prompt.as_deref())
        .bind(article.review().reviewer.as_deref())
        .bind(article.review().review_notes.as_deref())
        .bind(article.revision_count())
        .bind(article.view_count())
        .bind(article.last_viewed_at())
        .bind(article.created_at())
        .bind(article.updated_at())
        .bind(article.published_at())
}

/// Appends workflow log rows inside the caller's transaction.
pub(super) async fn append_workflow_events(
    transaction: &mut Transaction<'_, Postgres>,
    article_id: ArticleId,
    events: &[WorkflowEvent],
    changed_by: &str,
    changed_at: DateTime<Utc>,
) -> AppResult<()> {
    for event in events {
        sqlx::query(
            r#"
            INSERT INTO article_workflow_log (
                article_id,
                action,
                old_status,
                new_status,
                changed_by,
                change_notes,
                changed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(article_id.as_i64())
        .bind(event.action().as_str())
        .bind(event.old_status().map(|status| status.as_str()))
        .bind(event.new_status().map(|status| status.as_str()))
        .bind(changed_by)
        .bind(event.change_notes())
        .bind(changed_at)
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to append workflow log entry for article '{article_id}': {error}"
            ))
        })?;
    }

    Ok(())
}

/// Maps a failed article write, turning slug unique violations into `DuplicateSlug`.
pub(super) fn map_article_write_error(error: sqlx::Error, slug: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::DuplicateSlug(format!(
            "slug '{slug}' is already used by another article"
        ));
    }

    AppError::Internal(format!("failed to {operation} article '{slug}': {error}"))
}
