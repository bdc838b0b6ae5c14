use std::str::FromStr;

use chrono::{DateTime, Utc};
use moonlight_core::AppError;
use serde::{Deserialize, Serialize};

use crate::article::{ArticleId, ArticleStatus};

/// Stable action recorded in the article workflow log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowLogAction {
    /// Article row was inserted.
    Created,
    /// Article status moved between two values.
    StatusChanged,
    /// Title or body changed and the revision counter advanced.
    ContentEdited,
}

impl WorkflowLogAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::ContentEdited => "content_edited",
        }
    }
}

impl FromStr for WorkflowLogAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created" => Ok(Self::Created),
            "status_changed" => Ok(Self::StatusChanged),
            "content_edited" => Ok(Self::ContentEdited),
            _ => Err(AppError::Validation(format!(
                "unknown workflow log action '{value}'"
            ))),
        }
    }
}

/// Workflow side effect produced by an article mutation, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// Article was created in the given status.
    Created {
        /// Initial status.
        status: ArticleStatus,
    },
    /// Title or body changed.
    ContentEdited {
        /// Revision counter after the edit.
        revision: i32,
    },
    /// Status changed.
    StatusChanged {
        /// Status before the update.
        from: ArticleStatus,
        /// Status after the update.
        to: ArticleStatus,
        /// Review notes supplied together with the transition.
        notes: Option<String>,
    },
}

impl WorkflowEvent {
    /// Returns the log action for this event.
    #[must_use]
    pub fn action(&self) -> WorkflowLogAction {
        match self {
            Self::Created { .. } => WorkflowLogAction::Created,
            Self::ContentEdited { .. } => WorkflowLogAction::ContentEdited,
            Self::StatusChanged { .. } => WorkflowLogAction::StatusChanged,
        }
    }

    /// Returns the status before the event, when it describes a transition.
    #[must_use]
    pub fn old_status(&self) -> Option<ArticleStatus> {
        match self {
            Self::StatusChanged { from, .. } => Some(*from),
            Self::Created { .. } | Self::ContentEdited { .. } => None,
        }
    }

    /// Returns the status after the event, when the event carries one.
    #[must_use]
    pub fn new_status(&self) -> Option<ArticleStatus> {
        match self {
            Self::Created { status } => Some(*status),
            Self::StatusChanged { to, .. } => Some(*to),
            Self::ContentEdited { .. } => None,
        }
    }

    /// Returns free-form notes stored alongside the log row.
    #[must_use]
    pub fn change_notes(&self) -> Option<String> {
        match self {
            Self::Created { .. } => None,
            Self::ContentEdited { revision } => Some(format!("revision {revision}")),
            Self::StatusChanged { notes, .. } => notes.clone(),
        }
    }
}

/// Persisted, immutable workflow log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowLogEntry {
    /// Log row identifier, increasing in append order.
    pub id: i64,
    /// Article the entry belongs to.
    pub article_id: ArticleId,
    /// Recorded action.
    pub action: WorkflowLogAction,
    /// Status before a transition.
    pub old_status: Option<ArticleStatus>,
    /// Status after a transition or at creation.
    pub new_status: Option<ArticleStatus>,
    /// Subject of the acting user.
    pub changed_by: String,
    /// Optional notes.
    pub change_notes: Option<String>,
    /// Time the entry was appended.
    pub changed_at: DateTime<Utc>,
}

impl WorkflowLogEntry {
    /// Materializes a log row from a workflow event.
    #[must_use]
    pub fn from_event(
        id: i64,
        article_id: ArticleId,
        event: &WorkflowEvent,
        changed_by: impl Into<String>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            article_id,
            action: event.action(),
            old_status: event.old_status(),
            new_status: event.new_status(),
            changed_by: changed_by.into(),
            change_notes: event.change_notes(),
            changed_at,
        }
    }
}
