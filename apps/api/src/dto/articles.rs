mod conversions;
mod types;

pub use types::{
    ArticleImagePayload, ArticleResponse, CreateArticleRequest, PublishFailureResponse,
    PublishPendingResponse, PublishedArticleListQuery, UpdateArticleRequest,
    WorkflowLogEntryResponse,
};

#[cfg(test)]
mod tests;
