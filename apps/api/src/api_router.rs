use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use moonlight_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let editorial_routes = Router::new()
        .route(
            "/api/articles",
            post(handlers::articles::create_article_handler),
        )
        .route(
            "/api/articles/review",
            get(handlers::articles::list_review_queue_handler),
        )
        .route(
            "/api/articles/publish-pending",
            post(handlers::articles::publish_pending_handler),
        )
        .route(
            "/api/articles/{article_id}",
            get(handlers::articles::get_article_handler)
                .patch(handlers::articles::update_article_handler)
                .delete(handlers::articles::delete_article_handler),
        )
        .route(
            "/api/articles/{article_id}/workflow-log",
            get(handlers::articles::list_workflow_log_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_editor,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/articles/published",
            get(handlers::articles::list_published_articles_handler),
        )
        .route(
            "/api/articles/published/{slug}",
            get(handlers::articles::get_published_article_handler),
        )
        .route(
            "/api/articles/{article_id}/views",
            post(handlers::articles::record_view_handler),
        );

    Ok(Router::new()
        .merge(public_routes)
        .merge(editorial_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
