//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_article_repository;
mod postgres_article_repository;
mod system_clock;

pub use in_memory_article_repository::InMemoryArticleRepository;
pub use postgres_article_repository::PostgresArticleRepository;
pub use system_clock::SystemClock;
