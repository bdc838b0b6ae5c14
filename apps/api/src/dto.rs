mod articles;
mod common;

pub use articles::{
    ArticleImagePayload, ArticleResponse, CreateArticleRequest, PublishFailureResponse,
    PublishPendingResponse, PublishedArticleListQuery, UpdateArticleRequest,
    WorkflowLogEntryResponse,
};
pub use common::{HealthDependencyStatus, HealthResponse};
