use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moonlight_application::{ArticleRepository, PublishedArticleQuery};
use moonlight_core::{AppError, AppResult};
use moonlight_domain::{
    Article, ArticleChanges, ArticleId, ArticleStatus, ValidatedDraft, WorkflowEvent,
    WorkflowLogEntry,
};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Debug)]
struct StoredArticle {
    article: Article,
    deleted: bool,
}

type ArticleSlot = Arc<Mutex<StoredArticle>>;

/// In-memory article repository.
///
/// Each article sits behind its own mutex so writes to one article are
/// serialized while the shared map lock is only held for lookups. Log rows
/// are appended while the article's mutex is held and read under it, so a
/// reader never sees a log entry without the matching article state.
///
/// Lock order: article mutex, slug index, workflow log. The article map lock
/// is never held while waiting on an article mutex.
#[derive(Debug)]
pub struct InMemoryArticleRepository {
    articles: RwLock<HashMap<ArticleId, ArticleSlot>>,
    slugs: Mutex<HashMap<String, ArticleId>>,
    workflow_log: RwLock<HashMap<ArticleId, Vec<WorkflowLogEntry>>>,
    next_article_id: AtomicI64,
    next_log_id: AtomicI64,
}

impl Default for InMemoryArticleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryArticleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            articles: RwLock::new(HashMap::new()),
            slugs: Mutex::new(HashMap::new()),
            workflow_log: RwLock::new(HashMap::new()),
            next_article_id: AtomicI64::new(1),
            next_log_id: AtomicI64::new(1),
        }
    }

    async fn slot(&self, article_id: ArticleId) -> Option<ArticleSlot> {
        self.articles.read().await.get(&article_id).cloned()
    }

    async fn snapshot(&self) -> Vec<Article> {
        let slots: Vec<ArticleSlot> = self.articles.read().await.values().cloned().collect();

        let mut articles = Vec::with_capacity(slots.len());
        for slot in slots {
            let stored = slot.lock().await;
            if !stored.deleted {
                articles.push(stored.article.clone());
            }
        }

        articles
    }

    async fn append_events(
        &self,
        article_id: ArticleId,
        events: &[WorkflowEvent],
        changed_by: &str,
        changed_at: DateTime<Utc>,
    ) {
        if events.is_empty() {
            return;
        }

        let mut workflow_log = self.workflow_log.write().await;
        let entries = workflow_log.entry(article_id).or_default();
        for event in events {
            let log_id = self.next_log_id.fetch_add(1, Ordering::Relaxed);
            entries.push(WorkflowLogEntry::from_event(
                log_id, article_id, event, changed_by, changed_at,
            ));
        }
    }
}

fn article_not_found(article_id: ArticleId) -> AppError {
    AppError::NotFound(format!("article '{article_id}' does not exist"))
}

fn slug_taken(slug: &str) -> AppError {
    AppError::DuplicateSlug(format!("slug '{slug}' is already used by another article"))
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn insert_article(
        &self,
        draft: ValidatedDraft,
        changed_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Article> {
        let mut slugs = self.slugs.lock().await;
        let slug = draft.slug().as_str().to_owned();
        if slugs.contains_key(&slug) {
            return Err(slug_taken(&slug));
        }

        let article_id = ArticleId::new(self.next_article_id.fetch_add(1, Ordering::Relaxed))?;
        let (article, event) = Article::create(article_id, draft, now);

        // The log is unreachable until the slot is published below.
        self.append_events(article_id, &[event], changed_by, now)
            .await;
        self.articles.write().await.insert(
            article_id,
            Arc::new(Mutex::new(StoredArticle {
                article: article.clone(),
                deleted: false,
            })),
        );
        slugs.insert(slug, article_id);
        drop(slugs);

        debug!(%article_id, slug = article.slug().as_str(), "article stored in memory");
        Ok(article)
    }

    async fn update_article(
        &self,
        article_id: ArticleId,
        changes: ArticleChanges,
        changed_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Article> {
        let slot = self
            .slot(article_id)
            .await
            .ok_or_else(|| article_not_found(article_id))?;
        let mut stored = slot.lock().await;
        if stored.deleted {
            return Err(article_not_found(article_id));
        }

        let update = stored.article.apply_changes(changes, now)?;

        let previous_slug = stored.article.slug().as_str();
        let next_slug = update.article.slug().as_str();
        if previous_slug != next_slug {
            let mut slugs = self.slugs.lock().await;
            if slugs.contains_key(next_slug) {
                return Err(slug_taken(next_slug));
            }
            slugs.remove(previous_slug);
            slugs.insert(next_slug.to_owned(), article_id);
        }

        stored.article = update.article.clone();
        self.append_events(article_id, &update.events, changed_by, now)
            .await;

        Ok(update.article)
    }

    async fn record_view(&self, article_id: ArticleId, now: DateTime<Utc>) -> AppResult<Article> {
        let slot = self
            .slot(article_id)
            .await
            .ok_or_else(|| article_not_found(article_id))?;
        let mut stored = slot.lock().await;
        if stored.deleted {
            return Err(article_not_found(article_id));
        }

        stored.article.record_view(now);
        Ok(stored.article.clone())
    }

    async fn find_article(&self, article_id: ArticleId) -> AppResult<Option<Article>> {
        let Some(slot) = self.slot(article_id).await else {
            return Ok(None);
        };

        let stored = slot.lock().await;
        Ok((!stored.deleted).then(|| stored.article.clone()))
    }

    async fn find_article_by_slug(&self, slug: &str) -> AppResult<Option<Article>> {
        let article_id = self.slugs.lock().await.get(slug).copied();
        match article_id {
            Some(article_id) => self.find_article(article_id).await,
            None => Ok(None),
        }
    }

    async fn list_review_queue(&self) -> AppResult<Vec<Article>> {
        let mut queue: Vec<Article> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|article| article.status().awaits_review())
            .collect();
        queue.sort_by(Article::cmp_review_priority);

        Ok(queue)
    }

    async fn list_published(&self, query: PublishedArticleQuery) -> AppResult<Vec<Article>> {
        let mut published: Vec<Article> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|article| article.status() == ArticleStatus::Published)
            .filter(|article| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|category| article.category() == Some(category))
            })
            .filter(|article| {
                query
                    .tag
                    .as_deref()
                    .is_none_or(|tag| article.tags().iter().any(|stored| stored == tag))
            })
            .collect();
        published.sort_by(Article::cmp_publication_recency);

        Ok(published
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn list_article_ids_with_status(
        &self,
        status: ArticleStatus,
    ) -> AppResult<Vec<ArticleId>> {
        let mut article_ids: Vec<ArticleId> = self
            .snapshot()
            .await
            .iter()
            .filter(|article| article.status() == status)
            .map(Article::id)
            .collect();
        article_ids.sort();

        Ok(article_ids)
    }

    async fn list_workflow_log(
        &self,
        article_id: ArticleId,
    ) -> AppResult<Vec<WorkflowLogEntry>> {
        let Some(slot) = self.slot(article_id).await else {
            return Ok(Vec::new());
        };

        let stored = slot.lock().await;
        if stored.deleted {
            return Ok(Vec::new());
        }

        Ok(self
            .workflow_log
            .read()
            .await
            .get(&article_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_article(&self, article_id: ArticleId) -> AppResult<()> {
        let slot = self
            .articles
            .write()
            .await
            .remove(&article_id)
            .ok_or_else(|| article_not_found(article_id))?;

        let mut stored = slot.lock().await;
        stored.deleted = true;
        self.slugs.lock().await.remove(stored.article.slug().as_str());
        self.workflow_log.write().await.remove(&article_id);

        debug!(%article_id, "article removed from memory");
        Ok(())
    }
}
