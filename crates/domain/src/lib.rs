//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod article;
mod slug;
mod workflow_log;

pub use article::{
    Article, ArticleChanges, ArticleDraft, ArticleId, ArticleImage, ArticleRecord, ArticleStatus,
    ArticleUpdate, GenerationSource, Provenance, ReviewMetadata, SeoMetadata, ValidatedDraft,
    WORDS_PER_MINUTE,
};
pub use slug::{Slug, slugify};
pub use workflow_log::{WorkflowEvent, WorkflowLogAction, WorkflowLogEntry};
