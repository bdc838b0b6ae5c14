use super::*;

impl ArticleService {
    /// Lists one page of published articles, most recently published first.
    pub async fn list_published(
        &self,
        input: PublishedArticleListInput,
    ) -> AppResult<Vec<Article>> {
        let query = PublishedArticleQuery::try_from(input)?;
        self.repository.list_published(query).await
    }

    /// Returns the published article served under a slug.
    pub async fn get_published_article(&self, slug: &str) -> AppResult<Article> {
        self.repository
            .find_article_by_slug(slug)
            .await?
            .filter(|article| article.status() == ArticleStatus::Published)
            .ok_or_else(|| AppError::NotFound(format!("no published article with slug '{slug}'")))
    }

    /// Counts one page view. Views are not part of the workflow log.
    pub async fn record_view(&self, article_id: ArticleId) -> AppResult<Article> {
        self.repository.record_view(article_id, self.clock.now()).await
    }
}
