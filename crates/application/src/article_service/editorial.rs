use super::*;

impl ArticleService {
    /// Creates an article and records its `created` workflow entry.
    pub async fn create_article(
        &self,
        actor: &EditorIdentity,
        draft: ArticleDraft,
    ) -> AppResult<Article> {
        let draft = draft.validate()?;
        self.repository
            .insert_article(draft, actor.subject(), self.clock.now())
            .await
    }

    /// Applies field changes, maintaining revision, publish stamp and workflow log.
    pub async fn update_article(
        &self,
        actor: &EditorIdentity,
        article_id: ArticleId,
        changes: ArticleChanges,
    ) -> AppResult<Article> {
        self.repository
            .update_article(article_id, changes, actor.subject(), self.clock.now())
            .await
    }

    /// Lists draft and pending articles, AI-generated first, newest first.
    pub async fn list_review_queue(&self) -> AppResult<Vec<Article>> {
        self.repository.list_review_queue().await
    }

    /// Returns the workflow log of one article in append order.
    pub async fn list_workflow_log(
        &self,
        article_id: ArticleId,
    ) -> AppResult<Vec<WorkflowLogEntry>> {
        if self.repository.find_article(article_id).await?.is_none() {
            return Err(article_not_found(article_id));
        }

        self.repository.list_workflow_log(article_id).await
    }

    /// Publishes every pending article, one transaction per article.
    ///
    /// Each article must still be pending when its row is locked. Articles
    /// removed or moved to another status after listing are skipped. Other
    /// failures are collected so one bad row does not block the rest.
    pub async fn publish_pending(
        &self,
        actor: &EditorIdentity,
    ) -> AppResult<PublishPendingOutcome> {
        let pending_ids = self
            .repository
            .list_article_ids_with_status(ArticleStatus::Pending)
            .await?;

        let mut outcome = PublishPendingOutcome {
            published: Vec::with_capacity(pending_ids.len()),
            failed: Vec::new(),
        };

        for article_id in pending_ids {
            match self
                .update_article(
                    actor,
                    article_id,
                    ArticleChanges::status(ArticleStatus::Published)
                        .expecting(ArticleStatus::Pending),
                )
                .await
            {
                Ok(article) => outcome.published.push(article),
                Err(AppError::NotFound(_) | AppError::Conflict(_)) => {}
                Err(error) => outcome.failed.push((article_id, error.to_string())),
            }
        }

        Ok(outcome)
    }

    /// Removes an article and, by cascade, its workflow log.
    pub async fn delete_article(&self, article_id: ArticleId) -> AppResult<()> {
        self.repository.delete_article(article_id).await
    }
}
