//! Commands emitted by a presentation layer.
//!
//! The store never depends on a UI toolkit: a host turns user input into a
//! [`Command`] and hands it to the store's `dispatch`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Task, TaskId, TypesError};

/// A user intent the task store can carry out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Add a task.
    Create {
        /// Task text (ignored if blank).
        text: String,
    },
    /// Flip a task's completed flag.
    Toggle {
        /// Target task.
        id: TaskId,
    },
    /// Remove a task.
    Delete {
        /// Target task.
        id: TaskId,
    },
    /// Replace a task's text.
    Edit {
        /// Target task.
        id: TaskId,
        /// New text (ignored if blank).
        text: String,
    },
    /// Enter edit mode for a task.
    BeginEdit {
        /// Task being edited.
        id: TaskId,
    },
    /// Leave edit mode without changes.
    CancelEdit,
    /// Change which tasks are shown.
    SetFilter {
        /// The new filter.
        filter: Filter,
    },
    /// Manually trigger a drain of the pending queue.
    Sync,
}

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl Filter {
    /// Check if a task passes this filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

impl FromStr for Filter {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(TypesError::UnknownFilter(other.to_string())),
        }
    }
}

/// Severity of a toast-style notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information.
    Info,
    /// Something completed successfully.
    Success,
    /// Something failed.
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
