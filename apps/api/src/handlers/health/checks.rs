use sqlx::PgPool;

use crate::dto::HealthDependencyStatus;

pub(super) async fn check_article_store(pool: Option<PgPool>) -> HealthDependencyStatus {
    let Some(pool) = pool else {
        return HealthDependencyStatus {
            status: "ok",
            detail: Some("in-memory store".to_owned()),
        };
    };

    let check = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await;

    match check {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(format!("postgres check failed: {error}")),
        },
    }
}
