use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moonlight_application::{ArticleRepository, PublishedArticleQuery};
use moonlight_core::{AppError, AppResult};
use moonlight_domain::{
    Article, ArticleChanges, ArticleId, ArticleStatus, ValidatedDraft, WorkflowLogEntry,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

mod rows;
mod write;

use rows::{ARTICLE_COLUMNS, ArticleRow, WorkflowLogRow, articles_from_rows};
use write::{append_workflow_events, bind_article_columns, map_article_write_error};

/// PostgreSQL-backed article repository.
#[derive(Clone)]
pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn article_not_found(article_id: ArticleId) -> AppError {
    AppError::NotFound(format!("article '{article_id}' does not exist"))
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn insert_article(
        &self,
        draft: ValidatedDraft,
        changed_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Article> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let next_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT nextval(pg_get_serial_sequence('articles', 'id'))
            "#,
        )
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to allocate article id: {error}")))?;

        let (article, event) = Article::create(ArticleId::new(next_id)?, draft, now);

        let statement = format!(
            "INSERT INTO articles ({ARTICLE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
             $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, \
             $26)"
        );
        bind_article_columns(sqlx::query(&statement).bind(next_id), &article)
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_article_write_error(error, article.slug().as_str(), "insert"))?;

        append_workflow_events(&mut transaction, article.id(), &[event], changed_by, now).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        info!(
            article_id = %article.id(),
            slug = article.slug().as_str(),
            status = article.status().as_str(),
            actor = changed_by,
            "article created"
        );
        Ok(article)
    }

    async fn update_article(
        &self,
        article_id: ArticleId,
        changes: ArticleChanges,
        changed_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Article> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let statement = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, ArticleRow>(&statement)
            .bind(article_id.as_i64())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock article '{article_id}': {error}"))
            })?
            .ok_or_else(|| article_not_found(article_id))?;
        let current = Article::try_from(current)?;

        let update = current.apply_changes(changes, now)?;

        bind_article_columns(
            sqlx::query(
                r#"
                UPDATE articles
                SET
                    title = $2,
                    slug = $3,
                    body = $4,
                    excerpt = $5,
                    category = $6,
                    tags = $7,
                    status = $8,
                    featured_image_url = $9,
                    featured_image_alt = $10,
                    secondary_image_url = $11,
                    secondary_image_alt = $12,
                    meta_title = $13,
                    meta_description = $14,
                    author = $15,
                    generation_source = $16,
                    ai_model = $17,
                    generation_prompt = $18,
                    reviewer = $19,
                    review_notes = $20,
                    revision_count = $21,
                    view_count = $22,
                    last_viewed_at = $23,
                    created_at = $24,
                    updated_at = $25,
                    published_at = $26
                WHERE id = $1
                "#,
            )
            .bind(article_id.as_i64()),
            &update.article,
        )
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_article_write_error(error, update.article.slug().as_str(), "update"))?;

        append_workflow_events(&mut transaction, article_id, &update.events, changed_by, now)
            .await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        info!(
            %article_id,
            status = update.article.status().as_str(),
            revision = update.article.revision_count(),
            events = update.events.len(),
            actor = changed_by,
            "article updated"
        );
        Ok(update.article)
    }

    async fn record_view(&self, article_id: ArticleId, now: DateTime<Utc>) -> AppResult<Article> {
        let statement = format!(
            "UPDATE articles SET view_count = view_count + 1, last_viewed_at = $2, \
             updated_at = $2 WHERE id = $1 RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArticleRow>(&statement)
            .bind(article_id.as_i64())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to record view for article '{article_id}': {error}"
                ))
            })?
            .ok_or_else(|| article_not_found(article_id))?;

        Article::try_from(row)
    }

    async fn find_article(&self, article_id: ArticleId) -> AppResult<Option<Article>> {
        let statement = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&statement)
            .bind(article_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load article '{article_id}': {error}"))
            })?;

        row.map(Article::try_from).transpose()
    }

    async fn find_article_by_slug(&self, slug: &str) -> AppResult<Option<Article>> {
        let statement = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&statement)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load article by slug '{slug}': {error}"))
            })?;

        row.map(Article::try_from).transpose()
    }

    async fn list_review_queue(&self) -> AppResult<Vec<Article>> {
        let statement = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE status IN ('draft', 'pending') \
             ORDER BY (generation_source = 'ai') DESC, created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list review queue: {error}"))
            })?;

        articles_from_rows(rows)
    }

    async fn list_published(&self, query: PublishedArticleQuery) -> AppResult<Vec<Article>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE status = "
        ));
        builder.push_bind(ArticleStatus::Published.as_str());

        if let Some(category) = query.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        if let Some(tag) = query.tag {
            builder.push(" AND tags @> ARRAY[");
            builder.push_bind(tag);
            builder.push("]::TEXT[]");
        }

        builder.push(" ORDER BY published_at DESC NULLS LAST, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<ArticleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list published articles: {error}"))
            })?;

        articles_from_rows(rows)
    }

    async fn list_article_ids_with_status(
        &self,
        status: ArticleStatus,
    ) -> AppResult<Vec<ArticleId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM articles
            WHERE status = $1
            ORDER BY id
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list '{}' article ids: {error}",
                status.as_str()
            ))
        })?;

        ids.into_iter().map(ArticleId::new).collect()
    }

    async fn list_workflow_log(
        &self,
        article_id: ArticleId,
    ) -> AppResult<Vec<WorkflowLogEntry>> {
        let rows = sqlx::query_as::<_, WorkflowLogRow>(
            r#"
            SELECT id, article_id, action, old_status, new_status, changed_by, change_notes, changed_at
            FROM article_workflow_log
            WHERE article_id = $1
            ORDER BY id
            "#,
        )
        .bind(article_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list workflow log for article '{article_id}': {error}"
            ))
        })?;

        rows.into_iter().map(WorkflowLogEntry::try_from).collect()
    }

    async fn delete_article(&self, article_id: ArticleId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM articles
            WHERE id = $1
            "#,
        )
        .bind(article_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete article '{article_id}': {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(article_not_found(article_id));
        }

        info!(%article_id, "article deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
