use moonlight_domain::{ArticleChanges, ArticleDraft, ArticleStatus, GenerationSource};

use super::{CreateArticleRequest, UpdateArticleRequest};

#[test]
fn update_request_distinguishes_null_from_absent() {
    let request = serde_json::from_str::<UpdateArticleRequest>(
        r#"{ "excerpt": null, "category": "Guides", "status": "pending" }"#,
    );
    assert!(request.is_ok());

    let changes = request
        .map_err(|error| error.to_string())
        .and_then(|request| ArticleChanges::try_from(request).map_err(|error| error.to_string()));
    let changes = changes.unwrap_or_else(|_| unreachable!());
    assert_eq!(changes.excerpt, Some(None));
    assert_eq!(changes.category, Some(Some("Guides".to_owned())));
    assert_eq!(changes.meta_title, None);
    assert_eq!(changes.status, Some(ArticleStatus::Pending));
}

#[test]
fn update_request_rejects_unknown_status() {
    let request = UpdateArticleRequest {
        status: Some("live".to_owned()),
        ..UpdateArticleRequest::default()
    };
    assert!(ArticleChanges::try_from(request).is_err());
}

#[test]
fn create_request_defaults_optional_fields() {
    let request = serde_json::from_str::<CreateArticleRequest>(
        r#"{ "title": "Launch", "generation_source": "ai_edited", "tags": ["news"] }"#,
    );
    let draft = request
        .ok()
        .and_then(|request| ArticleDraft::try_from(request).ok())
        .unwrap_or_else(|| unreachable!());

    assert_eq!(draft.body, "");
    assert_eq!(draft.status, None);
    assert_eq!(draft.tags, vec!["news".to_owned()]);
    assert_eq!(
        draft.provenance.generation_source,
        GenerationSource::AiEdited
    );
}

#[test]
fn create_request_rejects_blank_image_url() {
    let request = serde_json::from_str::<CreateArticleRequest>(
        r#"{ "title": "Launch", "featured_image": { "url": "  ", "alt_text": null } }"#,
    );
    let draft = request.ok().map(ArticleDraft::try_from);
    assert!(matches!(draft, Some(Err(_))));
}
