use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::HealthResponse;
use crate::state::AppState;

mod checks;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let article_store = checks::check_article_store(state.postgres_pool.clone()).await;
    let ready = article_store.status != "error";

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if ready { "ok" } else { "degraded" },
            ready,
            article_store,
        }),
    )
}

