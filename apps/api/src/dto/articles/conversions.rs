use chrono::{DateTime, SecondsFormat, Utc};
use moonlight_application::{PublishPendingOutcome, PublishedArticleListInput};
use moonlight_core::AppError;
use moonlight_domain::{
    Article, ArticleChanges, ArticleDraft, ArticleImage, GenerationSource, Provenance,
    ReviewMetadata, SeoMetadata, WorkflowLogEntry,
};

use super::types::{
    ArticleImagePayload, ArticleResponse, CreateArticleRequest, PublishFailureResponse,
    PublishPendingResponse, PublishedArticleListQuery, UpdateArticleRequest,
    WorkflowLogEntryResponse,
};

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn image(payload: Option<ArticleImagePayload>) -> Result<Option<ArticleImage>, AppError> {
    payload
        .map(|payload| ArticleImage::new(payload.url, payload.alt_text))
        .transpose()
}

impl From<&ArticleImage> for ArticleImagePayload {
    fn from(value: &ArticleImage) -> Self {
        Self {
            url: value.url().to_owned(),
            alt_text: value.alt_text().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateArticleRequest> for ArticleDraft {
    type Error = AppError;

    fn try_from(value: CreateArticleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            slug: value.slug,
            body: value.body.unwrap_or_default(),
            excerpt: value.excerpt,
            category: value.category,
            tags: value.tags.unwrap_or_default(),
            status: value.status.map(|status| status.parse()).transpose()?,
            featured_image: image(value.featured_image)?,
            secondary_image: image(value.secondary_image)?,
            seo: SeoMetadata {
                meta_title: value.meta_title,
                meta_description: value.meta_description,
            },
            provenance: Provenance {
                author: value.author,
                generation_source: value
                    .generation_source
                    .map(|source| source.parse())
                    .transpose()?
                    .unwrap_or(GenerationSource::Human),
                ai_model: value.ai_model,
                generation_prompt: value.generation_prompt,
            },
            review: ReviewMetadata {
                reviewer: value.reviewer,
                review_notes: value.review_notes,
            },
        })
    }
}

impl TryFrom<UpdateArticleRequest> for ArticleChanges {
    type Error = AppError;

    fn try_from(value: UpdateArticleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            expected_status: value
                .expected_status
                .map(|status| status.parse())
                .transpose()?,
            title: value.title,
            slug: value.slug,
            body: value.body,
            excerpt: value.excerpt,
            category: value.category,
            tags: value.tags,
            status: value.status.map(|status| status.parse()).transpose()?,
            featured_image: value.featured_image.map(image).transpose()?,
            secondary_image: value.secondary_image.map(image).transpose()?,
            meta_title: value.meta_title,
            meta_description: value.meta_description,
            author: value.author,
            generation_source: value
                .generation_source
                .map(|source| source.parse())
                .transpose()?,
            ai_model: value.ai_model,
            generation_prompt: value.generation_prompt,
            reviewer: value.reviewer,
            review_notes: value.review_notes,
        })
    }
}

impl From<PublishedArticleListQuery> for PublishedArticleListInput {
    fn from(value: PublishedArticleListQuery) -> Self {
        Self {
            limit: value.limit,
            offset: value.offset,
            category: value.category,
            tag: value.tag,
        }
    }
}

impl From<Article> for ArticleResponse {
    fn from(value: Article) -> Self {
        Self {
            id: value.id().as_i64(),
            title: value.title().to_owned(),
            slug: value.slug().to_string(),
            body: value.body().to_owned(),
            excerpt: value.excerpt().map(ToOwned::to_owned),
            category: value.category().map(ToOwned::to_owned),
            tags: value.tags().to_vec(),
            status: value.status().as_str().to_owned(),
            featured_image: value.featured_image().map(ArticleImagePayload::from),
            secondary_image: value.secondary_image().map(ArticleImagePayload::from),
            meta_title: value.seo().meta_title.clone(),
            meta_description: value.seo().meta_description.clone(),
            author: value.provenance().author.clone(),
            generation_source: value.provenance().generation_source.as_str().to_owned(),
            ai_model: value.provenance().ai_model.clone(),
            generation_prompt: value.provenance().generation_prompt.clone(),
            reviewer: value.review().reviewer.clone(),
            review_notes: value.review().review_notes.clone(),
            revision_count: value.revision_count(),
            view_count: value.view_count(),
            word_count: u32::try_from(value.word_count()).unwrap_or(u32::MAX),
            reading_time_minutes: u32::try_from(value.reading_time_minutes()).unwrap_or(u32::MAX),
            last_viewed_at: value.last_viewed_at().map(timestamp),
            created_at: timestamp(value.created_at()),
            updated_at: timestamp(value.updated_at()),
            published_at: value.published_at().map(timestamp),
        }
    }
}

impl From<WorkflowLogEntry> for WorkflowLogEntryResponse {
    fn from(value: WorkflowLogEntry) -> Self {
        Self {
            id: value.id,
            article_id: value.article_id.as_i64(),
            action: value.action.as_str().to_owned(),
            old_status: value.old_status.map(|status| status.as_str().to_owned()),
            new_status: value.new_status.map(|status| status.as_str().to_owned()),
            changed_by: value.changed_by,
            change_notes: value.change_notes,
            changed_at: timestamp(value.changed_at),
        }
    }
}

impl From<PublishPendingOutcome> for PublishPendingResponse {
    fn from(value: PublishPendingOutcome) -> Self {
        Self {
            published: value
                .published
                .into_iter()
                .map(ArticleResponse::from)
                .collect(),
            failed: value
                .failed
                .into_iter()
                .map(|(article_id, message)| PublishFailureResponse {
                    article_id: article_id.as_i64(),
                    message,
                })
                .collect(),
        }
    }
}
