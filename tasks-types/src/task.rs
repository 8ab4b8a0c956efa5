//! The task entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TaskId;

/// Whether every change to a task has been acknowledged by the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// All mutations affecting the task were acknowledged.
    #[default]
    Synced,
    /// At least one queued mutation references the task.
    Pending,
}

impl SyncStatus {
    /// The status a freshly written task gets for the given connectivity.
    pub fn for_connectivity(online: bool) -> Self {
        if online {
            Self::Synced
        } else {
            Self::Pending
        }
    }

    /// Check if the status is pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A single entry of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation-ordered identifier.
    pub id: TaskId,
    /// Display text, never blank.
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task last changed; refreshed by every mutation.
    pub last_modified: DateTime<Utc>,
    /// Per-task sync flag.
    #[serde(default)]
    pub sync_status: SyncStatus,
}

impl Task {
    /// Create a new, not-completed task.
    ///
    /// Returns `None` if `text` is empty after trimming. The stored text is
    /// trimmed.
    pub fn new(id: TaskId, text: &str, status: SyncStatus, now: DateTime<Utc>) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Self {
            id,
            text,
            completed: false,
            created_at: now,
            last_modified: now,
            sync_status: status,
        })
    }

    /// Check if the task is still open.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Trim `text`, rejecting it if nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Counters over a task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Tasks not yet completed.
    pub active: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Tasks with unacknowledged changes.
    pub pending: usize,
}
