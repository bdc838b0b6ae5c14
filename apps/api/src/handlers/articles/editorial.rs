use super::*;

pub async fn create_article_handler(
    State(state): State<AppState>,
    Extension(editor): Extension<EditorIdentity>,
    Json(payload): Json<CreateArticleRequest>,
) -> ApiResult<(StatusCode, Json<ArticleResponse>)> {
    let draft = ArticleDraft::try_from(payload)?;
    let article = state.article_service.create_article(&editor, draft).await?;

    Ok((StatusCode::CREATED, Json(ArticleResponse::from(article))))
}

pub async fn get_article_handler(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<ArticleResponse>> {
    let article = state
        .article_service
        .get_article(article_id_from_path(article_id)?)
        .await?;

    Ok(Json(ArticleResponse::from(article)))
}

pub async fn update_article_handler(
    State(state): State<AppState>,
    Extension(editor): Extension<EditorIdentity>,
    Path(article_id): Path<i64>,
    Json(payload): Json<UpdateArticleRequest>,
) -> ApiResult<Json<ArticleResponse>> {
    let changes = ArticleChanges::try_from(payload)?;
    let article = state
        .article_service
        .update_article(&editor, article_id_from_path(article_id)?, changes)
        .await?;

    Ok(Json(ArticleResponse::from(article)))
}

pub async fn delete_article_handler(
    State(state): State<AppState>,
    Extension(editor): Extension<EditorIdentity>,
    Path(article_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let article_id = article_id_from_path(article_id)?;
    state.article_service.delete_article(article_id).await?;

    info!(%article_id, actor = editor.subject(), "article deleted by editor");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_review_queue_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ArticleResponse>>> {
    let articles = state
        .article_service
        .list_review_queue()
        .await?
        .into_iter()
        .map(ArticleResponse::from)
        .collect();

    Ok(Json(articles))
}

pub async fn list_workflow_log_handler(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<Vec<WorkflowLogEntryResponse>>> {
    let entries = state
        .article_service
        .list_workflow_log(article_id_from_path(article_id)?)
        .await?
        .into_iter()
        .map(WorkflowLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn publish_pending_handler(
    State(state): State<AppState>,
    Extension(editor): Extension<EditorIdentity>,
) -> ApiResult<Json<PublishPendingResponse>> {
    let outcome = state.article_service.publish_pending(&editor).await?;

    for (article_id, message) in &outcome.failed {
        warn!(%article_id, error = %message, "pending article was not published");
    }
    info!(
        published = outcome.published.len(),
        failed = outcome.failed.len(),
        actor = editor.subject(),
        "publish pending finished"
    );

    Ok(Json(PublishPendingResponse::from(outcome)))
}
