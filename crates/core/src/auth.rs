use serde::Serialize;

use crate::{AppResult, NonEmptyString};

/// Acting user recorded on every editorial mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorIdentity {
    subject: NonEmptyString,
}

impl EditorIdentity {
    /// Creates an editor identity from the subject supplied by the editing client.
    pub fn new(subject: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            subject: NonEmptyString::new(subject)?,
        })
    }

    /// Returns the stable subject recorded as `changed_by` in the workflow log.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}
