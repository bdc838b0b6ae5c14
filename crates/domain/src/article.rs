//! Article entity, status lifecycle and derived-field rules.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use moonlight_core::{AppError, AppResult, NonEmptyString, normalize_optional_text};
use serde::{Deserialize, Serialize};

use crate::slug::Slug;
use crate::workflow_log::WorkflowEvent;

/// Reading speed used for the estimated reading time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Numeric article identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArticleId(i64);

impl ArticleId {
    /// Creates an identifier from a positive storage value.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "article id must be positive, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the storage value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for ArticleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Article workflow status.
///
/// Every status may move to every other status. Only the first move into
/// [`ArticleStatus::Published`] has a side effect (the publish timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    /// Being written.
    #[default]
    Draft,
    /// Waiting for review.
    Pending,
    /// Publicly visible.
    Published,
    /// Withdrawn from the public site.
    Archived,
}

impl ArticleStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Returns whether articles in this status appear in the review queue.
    #[must_use]
    pub fn awaits_review(&self) -> bool {
        matches!(self, Self::Draft | Self::Pending)
    }
}

impl FromStr for ArticleStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::Validation(format!(
                "unknown article status '{value}'"
            ))),
        }
    }
}

/// How the article content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    /// Written by a person.
    #[default]
    Human,
    /// Generated by a model.
    Ai,
    /// Generated by a model, then edited by a person.
    AiEdited,
}

impl GenerationSource {
    /// Returns a stable storage value for this source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ai => "ai",
            Self::AiEdited => "ai_edited",
        }
    }
}

impl FromStr for GenerationSource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "human" => Ok(Self::Human),
            "ai" => Ok(Self::Ai),
            "ai_edited" => Ok(Self::AiEdited),
            _ => Err(AppError::Validation(format!(
                "unknown generation source '{value}'"
            ))),
        }
    }
}

/// Image reference stored in one of the two article image slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleImage {
    url: NonEmptyString,
    alt_text: Option<String>,
}

impl ArticleImage {
    /// Creates a validated image reference.
    pub fn new(url: impl Into<String>, alt_text: Option<String>) -> AppResult<Self> {
        Ok(Self {
            url: NonEmptyString::new(url)?,
            alt_text: normalize_optional_text(alt_text),
        })
    }

    /// Returns the public object URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the alternative text, if any.
    #[must_use]
    pub fn alt_text(&self) -> Option<&str> {
        self.alt_text.as_deref()
    }
}

/// Search engine metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    /// Title used in `<title>` and social cards.
    pub meta_title: Option<String>,
    /// Description used in search results.
    pub meta_description: Option<String>,
}

/// Authorship and generation provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Credited author.
    pub author: Option<String>,
    /// How the content was produced.
    pub generation_source: GenerationSource,
    /// Model identifier for generated content.
    pub ai_model: Option<String>,
    /// Prompt the content was generated from.
    pub generation_prompt: Option<String>,
}

/// Editorial review metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewMetadata {
    /// Assigned reviewer.
    pub reviewer: Option<String>,
    /// Reviewer notes.
    pub review_notes: Option<String>,
}

/// Caller input for a new article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    /// Article title.
    pub title: String,
    /// Explicit slug; derived from the title when absent.
    pub slug: Option<String>,
    /// Article body.
    pub body: String,
    /// Short summary.
    pub excerpt: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Initial status; defaults to draft.
    pub status: Option<ArticleStatus>,
    /// First image slot.
    pub featured_image: Option<ArticleImage>,
    /// Second image slot.
    pub secondary_image: Option<ArticleImage>,
    /// SEO metadata.
    pub seo: SeoMetadata,
    /// Provenance metadata.
    pub provenance: Provenance,
    /// Review metadata.
    pub review: ReviewMetadata,
}

impl ArticleDraft {
    /// Validates the draft and resolves its slug.
    pub fn validate(self) -> AppResult<ValidatedDraft> {
        let title = NonEmptyString::new(self.title)
            .map_err(|_| AppError::Validation("article title must not be empty".to_owned()))?;
        let slug = match normalize_optional_text(self.slug) {
            Some(slug) => Slug::parse(slug)?,
            None => Slug::from_title(title.as_str())?,
        };

        Ok(ValidatedDraft {
            title,
            slug,
            body: self.body,
            excerpt: normalize_optional_text(self.excerpt),
            category: normalize_optional_text(self.category),
            tags: normalize_tags(self.tags),
            status: self.status.unwrap_or_default(),
            featured_image: self.featured_image,
            secondary_image: self.secondary_image,
            seo: normalize_seo(self.seo),
            provenance: normalize_provenance(self.provenance),
            review: normalize_review(self.review),
        })
    }
}

/// Draft whose title and slug passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    title: NonEmptyString,
    slug: Slug,
    body: String,
    excerpt: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    status: ArticleStatus,
    featured_image: Option<ArticleImage>,
    secondary_image: Option<ArticleImage>,
    seo: SeoMetadata,
    provenance: Provenance,
    review: ReviewMetadata,
}

impl ValidatedDraft {
    /// Returns the resolved slug.
    #[must_use]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Returns the initial status.
    #[must_use]
    pub fn status(&self) -> ArticleStatus {
        self.status
    }
}

/// Field changes applied by one update. `None` leaves a field untouched;
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    /// Status the article must still have when the changes are applied.
    pub expected_status: Option<ArticleStatus>,
    /// New title.
    pub title: Option<String>,
    /// New explicit slug; a blank value keeps the current slug.
    pub slug: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New excerpt.
    pub excerpt: Option<Option<String>>,
    /// New category.
    pub category: Option<Option<String>>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
    /// New status.
    pub status: Option<ArticleStatus>,
    /// New first image.
    pub featured_image: Option<Option<ArticleImage>>,
    /// New second image.
    pub secondary_image: Option<Option<ArticleImage>>,
    /// New meta title.
    pub meta_title: Option<Option<String>>,
    /// New meta description.
    pub meta_description: Option<Option<String>>,
    /// New author.
    pub author: Option<Option<String>>,
    /// New generation source.
    pub generation_source: Option<GenerationSource>,
    /// New model identifier.
    pub ai_model: Option<Option<String>>,
    /// New generation prompt.
    pub generation_prompt: Option<Option<String>>,
    /// New reviewer.
    pub reviewer: Option<Option<String>>,
    /// New review notes.
    pub review_notes: Option<Option<String>>,
}

impl ArticleChanges {
    /// Changes that only move the article to another status.
    #[must_use]
    pub fn status(status: ArticleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Restricts these changes to an article still in `status`.
    #[must_use]
    pub fn expecting(mut self, status: ArticleStatus) -> Self {
        self.expected_status = Some(status);
        self
    }
}

/// Result of applying [`ArticleChanges`] to an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleUpdate {
    /// Article after the update.
    pub article: Article,
    /// Workflow events to append in the same transaction, in order.
    pub events: Vec<WorkflowEvent>,
}

/// Full persisted state used to rebuild an [`Article`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Identifier.
    pub id: ArticleId,
    /// Title.
    pub title: String,
    /// Slug.
    pub slug: String,
    /// Body.
    pub body: String,
    /// Excerpt.
    pub excerpt: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Status.
    pub status: ArticleStatus,
    /// First image slot.
    pub featured_image: Option<ArticleImage>,
    /// Second image slot.
    pub secondary_image: Option<ArticleImage>,
    /// SEO metadata.
    pub seo: SeoMetadata,
    /// Provenance metadata.
    pub provenance: Provenance,
    /// Review metadata.
    pub review: ReviewMetadata,
    /// Revision counter.
    pub revision_count: i32,
    /// View counter.
    pub view_count: i64,
    /// Last view time.
    pub last_viewed_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
    /// First publish time.
    pub published_at: Option<DateTime<Utc>>,
}

/// Article with its workflow-maintained fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    id: ArticleId,
    title: NonEmptyString,
    slug: Slug,
    body: String,
    excerpt: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    status: ArticleStatus,
    featured_image: Option<ArticleImage>,
    secondary_image: Option<ArticleImage>,
    seo: SeoMetadata,
    provenance: Provenance,
    review: ReviewMetadata,
    revision_count: i32,
    view_count: i64,
    last_viewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Creates a new article and the `created` workflow event.
    ///
    /// An article created directly as published is stamped with `now`.
    #[must_use]
    pub fn create(
        id: ArticleId,
        draft: ValidatedDraft,
        now: DateTime<Utc>,
    ) -> (Self, WorkflowEvent) {
        let status = draft.status;
        let article = Self {
            id,
            title: draft.title,
            slug: draft.slug,
            body: draft.body,
            excerpt: draft.excerpt,
            category: draft.category,
            tags: draft.tags,
            status,
            featured_image: draft.featured_image,
            secondary_image: draft.secondary_image,
            seo: draft.seo,
            provenance: draft.provenance,
            review: draft.review,
            revision_count: 0,
            view_count: 0,
            last_viewed_at: None,
            created_at: now,
            updated_at: now,
            published_at: (status == ArticleStatus::Published).then_some(now),
        };

        (article, WorkflowEvent::Created { status })
    }

    /// Rebuilds an article from persisted state.
    pub fn restore(record: ArticleRecord) -> AppResult<Self> {
        if record.revision_count < 0 || record.view_count < 0 {
            return Err(AppError::Validation(format!(
                "article '{}' has negative counters",
                record.id
            )));
        }

        Ok(Self {
            id: record.id,
            title: NonEmptyString::new(record.title)?,
            slug: Slug::parse(record.slug)?,
            body: record.body,
            excerpt: record.excerpt,
            category: record.category,
            tags: record.tags,
            status: record.status,
            featured_image: record.featured_image,
            secondary_image: record.secondary_image,
            seo: record.seo,
            provenance: record.provenance,
            review: record.review,
            revision_count: record.revision_count,
            view_count: record.view_count,
            last_viewed_at: record.last_viewed_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
            published_at: record.published_at,
        })
    }

    /// Applies field changes and derives the workflow side effects.
    ///
    /// Returns a new article value; `self` is left untouched so callers can
    /// discard the result when persistence fails. Fails with
    /// [`AppError::Conflict`] when `expected_status` no longer holds.
    pub fn apply_changes(
        &self,
        changes: ArticleChanges,
        now: DateTime<Utc>,
    ) -> AppResult<ArticleUpdate> {
        if let Some(expected) = changes
            .expected_status
            .filter(|expected| *expected != self.status)
        {
            return Err(AppError::Conflict(format!(
                "article '{}' is {}, expected {}",
                self.id,
                self.status.as_str(),
                expected.as_str()
            )));
        }

        let mut next = self.clone();

        if let Some(title) = changes.title {
            next.title = NonEmptyString::new(title)
                .map_err(|_| AppError::Validation("article title must not be empty".to_owned()))?;
        }
        if let Some(slug) = normalize_optional_text(changes.slug) {
            next.slug = Slug::parse(slug)?;
        }
        if let Some(body) = changes.body {
            next.body = body;
        }
        if let Some(excerpt) = changes.excerpt {
            next.excerpt = normalize_optional_text(excerpt);
        }
        if let Some(category) = changes.category {
            next.category = normalize_optional_text(category);
        }
        if let Some(tags) = changes.tags {
            next.tags = normalize_tags(tags);
        }
        if let Some(featured_image) = changes.featured_image {
            next.featured_image = featured_image;
        }
        if let Some(secondary_image) = changes.secondary_image {
            next.secondary_image = secondary_image;
        }
        if let Some(meta_title) = changes.meta_title {
            next.seo.meta_title = normalize_optional_text(meta_title);
        }
        if let Some(meta_description) = changes.meta_description {
            next.seo.meta_description = normalize_optional_text(meta_description);
        }
        if let Some(author) = changes.author {
            next.provenance.author = normalize_optional_text(author);
        }
        if let Some(generation_source) = changes.generation_source {
            next.provenance.generation_source = generation_source;
        }
        if let Some(ai_model) = changes.ai_model {
            next.provenance.ai_model = normalize_optional_text(ai_model);
        }
        if let Some(generation_prompt) = changes.generation_prompt {
            next.provenance.generation_prompt = normalize_optional_text(generation_prompt);
        }
        if let Some(reviewer) = changes.reviewer {
            next.review.reviewer = normalize_optional_text(reviewer);
        }
        let supplied_review_notes = changes.review_notes.map(normalize_optional_text);
        if let Some(review_notes) = supplied_review_notes.clone() {
            next.review.review_notes = review_notes;
        }
        if let Some(status) = changes.status {
            next.status = status;
        }

        let mut events = Vec::new();

        if next.title != self.title || next.body != self.body {
            next.revision_count = self.revision_count.checked_add(1).ok_or_else(|| {
                AppError::Internal(format!(
                    "revision counter overflow for article '{}'",
                    self.id
                ))
            })?;
            events.push(WorkflowEvent::ContentEdited {
                revision: next.revision_count,
            });
        }

        if next.status != self.status {
            if next.status == ArticleStatus::Published && next.published_at.is_none() {
                next.published_at = Some(now);
            }
            events.push(WorkflowEvent::StatusChanged {
                from: self.status,
                to: next.status,
                notes: supplied_review_notes.flatten(),
            });
        }

        next.updated_at = now;

        Ok(ArticleUpdate {
            article: next,
            events,
        })
    }

    /// Counts one public page view.
    pub fn record_view(&mut self, now: DateTime<Utc>) {
        self.view_count = self.view_count.saturating_add(1);
        self.last_viewed_at = Some(now);
        self.updated_at = now;
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> ArticleId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the slug.
    #[must_use]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Returns the excerpt.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the normalized tag set in lexical order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> ArticleStatus {
        self.status
    }

    /// Returns the first image slot.
    #[must_use]
    pub fn featured_image(&self) -> Option<&ArticleImage> {
        self.featured_image.as_ref()
    }

    /// Returns the second image slot.
    #[must_use]
    pub fn secondary_image(&self) -> Option<&ArticleImage> {
        self.secondary_image.as_ref()
    }

    /// Returns SEO metadata.
    #[must_use]
    pub fn seo(&self) -> &SeoMetadata {
        &self.seo
    }

    /// Returns provenance metadata.
    #[must_use]
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Returns review metadata.
    #[must_use]
    pub fn review(&self) -> &ReviewMetadata {
        &self.review
    }

    /// Returns the number of content edits since creation.
    #[must_use]
    pub fn revision_count(&self) -> i32 {
        self.revision_count
    }

    /// Returns the number of recorded views.
    #[must_use]
    pub fn view_count(&self) -> i64 {
        self.view_count
    }

    /// Returns the last view time.
    #[must_use]
    pub fn last_viewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_viewed_at
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation time.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the first publish time.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Review queue order: AI-generated first, then newest, then highest id.
    #[must_use]
    pub fn cmp_review_priority(&self, other: &Self) -> Ordering {
        let self_generated = self.provenance.generation_source == GenerationSource::Ai;
        let other_generated = other.provenance.generation_source == GenerationSource::Ai;

        other_generated
            .cmp(&self_generated)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| other.id.cmp(&self.id))
    }

    /// Public listing order: most recently published first, then highest id.
    #[must_use]
    pub fn cmp_publication_recency(&self, other: &Self) -> Ordering {
        other
            .published_at
            .cmp(&self.published_at)
            .then_with(|| other.id.cmp(&self.id))
    }

    /// Returns the number of whitespace-separated words in the body.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Returns the estimated reading time, never less than one minute.
    #[must_use]
    pub fn reading_time_minutes(&self) -> usize {
        self.word_count().div_ceil(WORDS_PER_MINUTE).max(1)
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .filter_map(|tag| {
            let trimmed = tag.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn normalize_seo(seo: SeoMetadata) -> SeoMetadata {
    SeoMetadata {
        meta_title: normalize_optional_text(seo.meta_title),
        meta_description: normalize_optional_text(seo.meta_description),
    }
}

fn normalize_provenance(provenance: Provenance) -> Provenance {
    Provenance {
        author: normalize_optional_text(provenance.author),
        generation_source: provenance.generation_source,
        ai_model: normalize_optional_text(provenance.ai_model),
        generation_prompt: normalize_optional_text(provenance.generation_prompt),
    }
}

fn normalize_review(review: ReviewMetadata) -> ReviewMetadata {
    ReviewMetadata {
        reviewer: normalize_optional_text(review.reviewer),
        review_notes: normalize_optional_text(review.review_notes),
    }
}
