use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use moonlight_application::{ArticleRepository, PublishedArticleQuery};
use moonlight_core::AppError;
use moonlight_domain::{
    Article, ArticleChanges, ArticleDraft, ArticleImage, ArticleStatus, GenerationSource,
    Provenance, WorkflowLogAction,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresArticleRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres article repository tests: {error}");
    }

    Some(pool)
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn unique_title(prefix: &str) -> String {
    format!(
        "{prefix} {}",
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

async fn insert(repository: &PostgresArticleRepository, draft: ArticleDraft) -> Article {
    let validated = draft.validate().unwrap_or_else(|_| unreachable!());
    let inserted = repository.insert_article(validated, "editor", now()).await;
    assert!(inserted.is_ok());
    inserted.unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn insert_round_trips_every_column_and_logs_creation() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresArticleRepository::new(pool);

    let article = insert(
        &repository,
        ArticleDraft {
            title: unique_title("Round Trip"),
            body: "Body text.".to_owned(),
            category: Some("Guides".to_owned()),
            tags: vec!["b".to_owned(), "a".to_owned()],
            status: Some(ArticleStatus::Published),
            featured_image: ArticleImage::new(
                "https://cdn.test/hero.png",
                Some("Hero".to_owned()),
            )
            .ok(),
            provenance: Provenance {
                generation_source: GenerationSource::AiEdited,
                ai_model: Some("writer-large".to_owned()),
                ..Provenance::default()
            },
            ..ArticleDraft::default()
        },
    )
    .await;
    assert!(article.published_at().is_some());

    let stored = repository.find_article(article.id()).await;
    assert_eq!(stored.ok().flatten(), Some(article.clone()));

    let by_slug = repository
        .find_article_by_slug(article.slug().as_str())
        .await;
    assert_eq!(by_slug.ok().flatten().map(|found| found.id()), Some(article.id()));

    let log = repository
        .list_workflow_log(article.id())
        .await
        .unwrap_or_default();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, WorkflowLogAction::Created);
    assert_eq!(log[0].new_status, Some(ArticleStatus::Published));
}

#[tokio::test]
async fn duplicate_slug_maps_to_duplicate_error() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresArticleRepository::new(pool);
    let title = unique_title("Duplicate");
    insert(
        &repository,
        ArticleDraft {
            title: title.clone(),
            ..ArticleDraft::default()
        },
    )
    .await;

    let duplicate = ArticleDraft {
        title: format!("{title}!"),
        ..ArticleDraft::default()
    }
    .validate()
    .unwrap_or_else(|_| unreachable!());
    let result = repository.insert_article(duplicate, "editor", now()).await;
    assert!(matches!(result, Err(AppError::DuplicateSlug(_))));
}

#[tokio::test]
async fn update_logs_content_edit_before_status_change() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresArticleRepository::new(pool);
    let article = insert(
        &repository,
        ArticleDraft {
            title: unique_title("Workflow"),
            status: Some(ArticleStatus::Pending),
            ..ArticleDraft::default()
        },
    )
    .await;

    let published_at = now() + Duration::minutes(1);
    let updated = repository
        .update_article(
            article.id(),
            ArticleChanges {
                body: Some("Edited.".to_owned()),
                status: Some(ArticleStatus::Published),
                review_notes: Some(Some("ship it".to_owned())),
                ..ArticleChanges::default()
            },
            "reviewer",
            published_at,
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.revision_count(), 1);
    assert_eq!(updated.published_at(), Some(published_at));

    let log = repository
        .list_workflow_log(article.id())
        .await
        .unwrap_or_default();
    let actions: Vec<WorkflowLogAction> = log.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        vec![
            WorkflowLogAction::Created,
            WorkflowLogAction::ContentEdited,
            WorkflowLogAction::StatusChanged,
        ]
    );
    assert_eq!(log[2].old_status, Some(ArticleStatus::Pending));
    assert_eq!(log[2].change_notes.as_deref(), Some("ship it"));
    assert_eq!(log[2].changed_by, "reviewer");
}

#[tokio::test]
async fn concurrent_updates_each_advance_the_revision() {
    const WRITERS: i32 = 8;

    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = Arc::new(PostgresArticleRepository::new(pool));
    let article = insert(
        &repository,
        ArticleDraft {
            title: unique_title("Concurrent"),
            ..ArticleDraft::default()
        },
    )
    .await;

    let mut handles = Vec::new();
    for writer in 0..WRITERS {
        let repository = Arc::clone(&repository);
        let article_id = article.id();
        handles.push(tokio::spawn(async move {
            repository
                .update_article(
                    article_id,
                    ArticleChanges {
                        body: Some(format!("Writer {writer}.")),
                        ..ArticleChanges::default()
                    },
                    "editor",
                    now(),
                )
                .await
        }));
    }
    for handle in handles {
        assert!(matches!(handle.await, Ok(Ok(_))));
    }

    let stored = repository.find_article(article.id()).await.ok().flatten();
    assert_eq!(stored.map(|found| found.revision_count()), Some(WRITERS));
    let edits = repository
        .list_workflow_log(article.id())
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| entry.action == WorkflowLogAction::ContentEdited)
        .count();
    assert_eq!(edits, usize::try_from(WRITERS).unwrap_or_default());
}

#[tokio::test]
async fn record_view_and_published_filters() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresArticleRepository::new(pool);
    let tag = unique_title("tag");
    let article = insert(
        &repository,
        ArticleDraft {
            title: unique_title("Viewed"),
            status: Some(ArticleStatus::Published),
            tags: vec![tag.clone()],
            ..ArticleDraft::default()
        },
    )
    .await;

    let viewed = repository.record_view(article.id(), now()).await;
    assert_eq!(viewed.ok().map(|found| found.view_count()), Some(1));
    assert_eq!(
        repository
            .list_workflow_log(article.id())
            .await
            .unwrap_or_default()
            .len(),
        1
    );

    let tagged = repository
        .list_published(PublishedArticleQuery {
            limit: 10,
            offset: 0,
            category: None,
            tag: Some(tag),
        })
        .await
        .unwrap_or_default();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id(), article.id());
}

#[tokio::test]
async fn delete_cascades_workflow_log() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresArticleRepository::new(pool);
    let article = insert(
        &repository,
        ArticleDraft {
            title: unique_title("Removed"),
            ..ArticleDraft::default()
        },
    )
    .await;

    assert!(repository.delete_article(article.id()).await.is_ok());
    assert!(matches!(repository.find_article(article.id()).await, Ok(None)));
    assert!(
        repository
            .list_workflow_log(article.id())
            .await
            .unwrap_or_default()
            .is_empty()
    );
    assert!(matches!(
        repository.delete_article(article.id()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn stale_expected_status_rolls_back_the_update() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresArticleRepository::new(pool);

    let article = insert(
        &repository,
        ArticleDraft {
            title: unique_title("Withdrawn"),
            status: Some(ArticleStatus::Archived),
            ..ArticleDraft::default()
        },
    )
    .await;

    let result = repository
        .update_article(
            article.id(),
            ArticleChanges::status(ArticleStatus::Published).expecting(ArticleStatus::Pending),
            "editor",
            now(),
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = repository.find_article(article.id()).await.ok().flatten();
    assert_eq!(
        stored.map(|stored| (stored.status(), stored.published_at())),
        Some((ArticleStatus::Archived, None))
    );
    let log = repository
        .list_workflow_log(article.id())
        .await
        .unwrap_or_default();
    assert_eq!(log.len(), 1);
}
