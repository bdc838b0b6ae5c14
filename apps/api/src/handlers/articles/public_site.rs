use super::*;

pub async fn list_published_articles_handler(
    State(state): State<AppState>,
    Query(query): Query<PublishedArticleListQuery>,
) -> ApiResult<Json<Vec<ArticleResponse>>> {
    let articles = state
        .article_service
        .list_published(query.into())
        .await?
        .into_iter()
        .map(ArticleResponse::from)
        .collect();

    Ok(Json(articles))
}

pub async fn get_published_article_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ArticleResponse>> {
    let article = state
        .article_service
        .get_published_article(slug.as_str())
        .await?;

    Ok(Json(ArticleResponse::from(article)))
}

pub async fn record_view_handler(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .article_service
        .record_view(article_id_from_path(article_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
