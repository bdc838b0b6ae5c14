//! Application services and ports.

#![forbid(unsafe_code)]

mod article_ports;
mod article_service;

pub use article_ports::{
    ArticleRepository, Clock, DEFAULT_PUBLISHED_PAGE_SIZE, PublishedArticleListInput,
    PublishedArticleQuery,
};
pub use article_service::{ArticleService, PublishPendingOutcome};
