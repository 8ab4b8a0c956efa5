//! Queued mutations.
//!
//! A [`Mutation`] records one task-affecting change made while the remote
//! was unreachable. Mutations are replayed in queue order; the `timestamp`
//! is kept for diagnostics only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{MutationId, Task, TaskId};

/// The kind of change a mutation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationAction {
    /// A task was created.
    Create,
    /// A task was toggled or edited.
    Update,
    /// A task was removed.
    Delete,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Payload of a mutation.
///
/// Create and update carry a full task snapshot; delete carries only the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MutationData {
    /// Full snapshot of the task after the change.
    Snapshot(Task),
    /// Reference to a removed task.
    Reference {
        /// Id of the removed task.
        id: TaskId,
    },
}

impl MutationData {
    /// The id of the task this payload targets.
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Snapshot(task) => task.id,
            Self::Reference { id } => *id,
        }
    }

    /// The task snapshot, if this payload carries one.
    pub fn snapshot(&self) -> Option<&Task> {
        match self {
            Self::Snapshot(task) => Some(task),
            Self::Reference { .. } => None,
        }
    }
}

/// A not-yet-acknowledged change waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Unique identifier of the queue entry.
    pub id: MutationId,
    /// What happened to the task.
    pub action: MutationAction,
    /// Snapshot or reference, matching `action`.
    pub data: MutationData,
    /// When the mutation was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Mutation {
    /// A `create` mutation carrying the new task.
    pub fn create(task: Task, now: DateTime<Utc>) -> Self {
        Self::with(MutationAction::Create, MutationData::Snapshot(task), now)
    }

    /// An `update` mutation carrying the changed task.
    pub fn update(task: Task, now: DateTime<Utc>) -> Self {
        Self::with(MutationAction::Update, MutationData::Snapshot(task), now)
    }

    /// A `delete` mutation carrying only the removed task's id.
    pub fn delete(id: TaskId, now: DateTime<Utc>) -> Self {
        Self::with(MutationAction::Delete, MutationData::Reference { id }, now)
    }

    fn with(action: MutationAction, data: MutationData, now: DateTime<Utc>) -> Self {
        Self {
            id: MutationId::new(),
            action,
            data,
            timestamp: now,
        }
    }

    /// The id of the task this mutation targets.
    pub fn task_id(&self) -> TaskId {
        self.data.task_id()
    }
}
