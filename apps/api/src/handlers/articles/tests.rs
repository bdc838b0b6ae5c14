use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use moonlight_application::ArticleService;
use moonlight_core::EditorIdentity;
use moonlight_infrastructure::{InMemoryArticleRepository, SystemClock};

use super::{
    create_article_handler, delete_article_handler, get_article_handler,
    get_published_article_handler, list_published_articles_handler, list_review_queue_handler,
    list_workflow_log_handler, publish_pending_handler, record_view_handler,
    update_article_handler,
};
use crate::dto::{CreateArticleRequest, PublishedArticleListQuery, UpdateArticleRequest};
use crate::state::AppState;

fn test_state() -> AppState {
    AppState {
        article_service: ArticleService::new(
            Arc::new(InMemoryArticleRepository::new()),
            Arc::new(SystemClock),
        ),
        postgres_pool: None,
        editor_api_token: "0123456789abcdef0123456789abcdef".to_owned(),
    }
}

fn editor() -> Extension<EditorIdentity> {
    Extension(EditorIdentity::new("editor@moonlight.test").unwrap_or_else(|_| unreachable!()))
}

fn create_request(title: &str, status: Option<&str>) -> CreateArticleRequest {
    CreateArticleRequest {
        title: title.to_owned(),
        body: Some("One two three four.".to_owned()),
        status: status.map(ToOwned::to_owned),
        ..CreateArticleRequest::default()
    }
}

async fn create(state: &AppState, title: &str, status: Option<&str>) -> i64 {
    let response =
        create_article_handler(State(state.clone()), editor(), Json(create_request(title, status)))
            .await;
    let (status_code, Json(article)) = response.unwrap_or_else(|_| unreachable!());
    assert_eq!(status_code, StatusCode::CREATED);
    article.id
}

#[tokio::test]
async fn create_returns_created_article_with_derived_fields() {
    let state = test_state();

    let response = create_article_handler(
        State(state.clone()),
        editor(),
        Json(create_request("Hello, World! 2024", None)),
    )
    .await;
    let (status_code, Json(article)) = response.unwrap_or_else(|_| unreachable!());

    assert_eq!(status_code, StatusCode::CREATED);
    assert_eq!(article.slug, "hello-world-2024");
    assert_eq!(article.status, "draft");
    assert_eq!(article.word_count, 4);
    assert_eq!(article.reading_time_minutes, 1);
    assert_eq!(article.published_at, None);
}

#[tokio::test]
async fn duplicate_slug_returns_conflict() {
    let state = test_state();
    create(&state, "Same Title", None).await;

    let response = create_article_handler(
        State(state.clone()),
        editor(),
        Json(create_request("Same title", None)),
    )
    .await;
    assert!(response.is_err());
    assert_eq!(
        response.into_response().status(),
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn invalid_status_returns_bad_request() {
    let state = test_state();

    let response = create_article_handler(
        State(state),
        editor(),
        Json(create_request("Odd Status", Some("live"))),
    )
    .await;
    assert_eq!(
        response.into_response().status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn update_then_read_workflow_log() {
    let state = test_state();
    let article_id = create(&state, "Editable", Some("pending")).await;

    let updated = update_article_handler(
        State(state.clone()),
        editor(),
        Path(article_id),
        Json(UpdateArticleRequest {
            body: Some("Fresh body.".to_owned()),
            status: Some("published".to_owned()),
            ..UpdateArticleRequest::default()
        }),
    )
    .await;
    let Json(updated) = updated.unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.revision_count, 1);
    assert_eq!(updated.status, "published");
    assert!(updated.published_at.is_some());

    let log = list_workflow_log_handler(State(state.clone()), Path(article_id)).await;
    let Json(log) = log.unwrap_or_else(|_| unreachable!());
    let actions: Vec<&str> = log.iter().map(|entry| entry.action.as_str()).collect();
    assert_eq!(actions, vec!["created", "content_edited", "status_changed"]);
    assert_eq!(log[2].old_status.as_deref(), Some("pending"));
    assert_eq!(log[2].changed_by, "editor@moonlight.test");
}

#[tokio::test]
async fn stale_expected_status_returns_conflict() {
    let state = test_state();
    let article_id = create(&state, "Raced", Some("archived")).await;

    let stale = update_article_handler(
        State(state.clone()),
        editor(),
        Path(article_id),
        Json(UpdateArticleRequest {
            expected_status: Some("pending".to_owned()),
            status: Some("published".to_owned()),
            ..UpdateArticleRequest::default()
        }),
    )
    .await;
    assert_eq!(stale.into_response().status(), StatusCode::CONFLICT);

    let article = get_article_handler(State(state), Path(article_id)).await;
    let Json(article) = article.unwrap_or_else(|_| unreachable!());
    assert_eq!(article.status, "archived");
    assert!(article.published_at.is_none());
}

#[tokio::test]
async fn missing_and_out_of_range_ids_are_not_found() {
    let state = test_state();

    for article_id in [42, 0, -7] {
        let article = get_article_handler(State(state.clone()), Path(article_id)).await;
        assert_eq!(article.into_response().status(), StatusCode::NOT_FOUND);

        let view = record_view_handler(State(state.clone()), Path(article_id)).await;
        assert_eq!(view.into_response().status(), StatusCode::NOT_FOUND);

        let update = update_article_handler(
            State(state.clone()),
            editor(),
            Path(article_id),
            Json(UpdateArticleRequest::default()),
        )
        .await;
        assert_eq!(update.into_response().status(), StatusCode::NOT_FOUND);

        let log = list_workflow_log_handler(State(state.clone()), Path(article_id)).await;
        assert_eq!(log.into_response().status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn public_routes_only_expose_published_articles() {
    let state = test_state();
    let published_id = create(&state, "Live Story", Some("published")).await;
    create(&state, "Draft Story", None).await;

    let listed = list_published_articles_handler(
        State(state.clone()),
        Query(PublishedArticleListQuery::default()),
    )
    .await;
    let Json(listed) = listed.unwrap_or_else(|_| unreachable!());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, published_id);

    let draft = get_published_article_handler(State(state.clone()), Path("draft-story".to_owned()))
        .await;
    assert_eq!(draft.into_response().status(), StatusCode::NOT_FOUND);

    let viewed = record_view_handler(State(state.clone()), Path(published_id)).await;
    assert_eq!(viewed.into_response().status(), StatusCode::NO_CONTENT);

    let live = get_published_article_handler(State(state.clone()), Path("live-story".to_owned()))
        .await;
    let Json(live) = live.unwrap_or_else(|_| unreachable!());
    assert_eq!(live.view_count, 1);

    let negative = list_published_articles_handler(
        State(state),
        Query(PublishedArticleListQuery {
            offset: Some(-1),
            ..PublishedArticleListQuery::default()
        }),
    )
    .await;
    assert_eq!(negative.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_queue_publish_pending_and_delete() {
    let state = test_state();
    let draft_id = create(&state, "Queued Draft", None).await;
    let pending_id = create(&state, "Queued Pending", Some("pending")).await;
    create(&state, "Already Published", Some("published")).await;

    let queue = list_review_queue_handler(State(state.clone())).await;
    let Json(queue) = queue.unwrap_or_else(|_| unreachable!());
    let mut queued: Vec<i64> = queue.iter().map(|article| article.id).collect();
    queued.sort_unstable();
    assert_eq!(queued, vec![draft_id, pending_id]);

    let outcome = publish_pending_handler(State(state.clone()), editor()).await;
    let Json(outcome) = outcome.unwrap_or_else(|_| unreachable!());
    let published: Vec<i64> = outcome.published.iter().map(|article| article.id).collect();
    assert_eq!(published, vec![pending_id]);
    assert!(outcome.failed.is_empty());

    let deleted = delete_article_handler(State(state.clone()), editor(), Path(draft_id)).await;
    assert_eq!(deleted.into_response().status(), StatusCode::NO_CONTENT);

    let log = list_workflow_log_handler(State(state), Path(draft_id)).await;
    assert_eq!(log.into_response().status(), StatusCode::NOT_FOUND);
}
