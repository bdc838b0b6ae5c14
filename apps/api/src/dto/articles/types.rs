use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Image reference for one of the two article image slots.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/article-image-payload.ts"
)]
pub struct ArticleImagePayload {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Incoming payload for article creation.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-article-request.ts"
)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    #[ts(type = "\"draft\" | \"pending\" | \"published\" | \"archived\" | null")]
    pub status: Option<String>,
    #[serde(default)]
    pub featured_image: Option<ArticleImagePayload>,
    #[serde(default)]
    pub secondary_image: Option<ArticleImagePayload>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    #[ts(type = "\"human\" | \"ai\" | \"ai_edited\" | null")]
    pub generation_source: Option<String>,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub generation_prompt: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

/// Incoming payload for article updates.
///
/// Absent fields are left untouched. Nullable fields accept `null` to clear
/// the stored value. `expected_status` rejects the update with 409 when the
/// article has moved to another status in the meantime.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-article-request.ts"
)]
pub struct UpdateArticleRequest {
    #[serde(default)]
    #[ts(type = "\"draft\" | \"pending\" | \"published\" | \"archived\" | null")]
    pub expected_status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    #[ts(type = "\"draft\" | \"pending\" | \"published\" | \"archived\" | null")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<ArticleImagePayload>")]
    pub featured_image: Option<Option<ArticleImagePayload>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<ArticleImagePayload>")]
    pub secondary_image: Option<Option<ArticleImagePayload>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub meta_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub meta_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub author: Option<Option<String>>,
    #[serde(default)]
    #[ts(type = "\"human\" | \"ai\" | \"ai_edited\" | null")]
    pub generation_source: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub ai_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub generation_prompt: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub reviewer: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[ts(as = "Option<String>")]
    pub review_notes: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query string of the public published listing.
#[derive(Debug, Default, Deserialize)]
pub struct PublishedArticleListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// API representation of an article.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/article-response.ts"
)]
pub struct ArticleResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    #[ts(type = "\"draft\" | \"pending\" | \"published\" | \"archived\"")]
    pub status: String,
    pub featured_image: Option<ArticleImagePayload>,
    pub secondary_image: Option<ArticleImagePayload>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub author: Option<String>,
    #[ts(type = "\"human\" | \"ai\" | \"ai_edited\"")]
    pub generation_source: String,
    pub ai_model: Option<String>,
    pub generation_prompt: Option<String>,
    pub reviewer: Option<String>,
    pub review_notes: Option<String>,
    pub revision_count: i32,
    #[ts(type = "number")]
    pub view_count: i64,
    pub word_count: u32,
    pub reading_time_minutes: u32,
    pub last_viewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

/// API representation of one workflow log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/workflow-log-entry-response.ts"
)]
pub struct WorkflowLogEntryResponse {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub article_id: i64,
    #[ts(type = "\"created\" | \"status_changed\" | \"content_edited\"")]
    pub action: String,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub changed_by: String,
    pub change_notes: Option<String>,
    pub changed_at: String,
}

/// One article the batch publish could not move.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-failure-response.ts"
)]
pub struct PublishFailureResponse {
    #[ts(type = "number")]
    pub article_id: i64,
    pub message: String,
}

/// Result of publishing every pending article.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-pending-response.ts"
)]
pub struct PublishPendingResponse {
    pub published: Vec<ArticleResponse>,
    pub failed: Vec<PublishFailureResponse>,
}
