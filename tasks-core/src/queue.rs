//! Pending-mutation queue for offline-tasks.
//!
//! This module provides the queue of mutations recorded while the remote was
//! unreachable:
//! - FIFO ordering for replay
//! - Append-only: there is no way to remove a single entry
//! - Atomic commit of a drained prefix once every entry in it was accepted
//!
//! The queue is used by tasks-client's `TaskStore`. Entries are pushed while
//! offline, replayed in order during a drain, and removed only by
//! [`MutationQueue::commit`] after the whole batch succeeded.

use std::collections::VecDeque;
use tasks_types::{Mutation, TaskId};

/// Ordered log of not-yet-acknowledged mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationQueue {
    entries: VecDeque<Mutation>,
}

impl MutationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from persisted entries, keeping their order.
    pub fn from_entries(entries: Vec<Mutation>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Append a mutation to the back of the queue.
    pub fn push(&mut self, mutation: Mutation) {
        self.entries.push_back(mutation);
    }

    /// Get the entry at `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Mutation> {
        self.entries.get(index)
    }

    /// Number of queued mutations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in replay order.
    pub fn iter(&self) -> impl Iterator<Item = &Mutation> {
        self.entries.iter()
    }

    /// Check if any entry targets `task_id`.
    pub fn references(&self, task_id: TaskId) -> bool {
        self.entries.iter().any(|m| m.task_id() == task_id)
    }

    /// Check if any entry after position `index` targets `task_id`.
    pub fn references_after(&self, index: usize, task_id: TaskId) -> bool {
        self.entries
            .iter()
            .skip(index.saturating_add(1))
            .any(|m| m.task_id() == task_id)
    }

    /// Remove the first `count` entries as one unit.
    ///
    /// Called only after every one of those entries was accepted by the
    /// remote. Entries appended after the drain started stay queued.
    pub fn commit(&mut self, count: usize) {
        let count = count.min(self.entries.len());
        self.entries.drain(..count);
    }

    /// Clone all entries for persistence.
    pub fn entries(&self) -> Vec<Mutation> {
        self.entries.iter().cloned().collect()
    }
}
