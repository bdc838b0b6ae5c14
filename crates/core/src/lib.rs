//! Shared primitives for all Rust crates in Moonlight.

#![forbid(unsafe_code)]

/// Editor identity primitives shared across services.
pub mod auth;

use serde::Serialize;
use thiserror::Error;

pub use auth::EditorIdentity;

/// Result type used across Moonlight crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    ///
    /// Surrounding whitespace is trimmed before the value is stored.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Normalizes optional free text: whitespace-only values become `None`.
#[must_use]
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Slug is already used by another article.
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),

    /// Article no longer matches the state a write was prepared against.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated for the requested surface.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
