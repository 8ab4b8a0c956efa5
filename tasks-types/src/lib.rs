//! # tasks-types
//!
//! Data model for offline-tasks, an offline-first task list.
//!
//! This crate provides the foundational types used across all offline-tasks crates:
//! - [`TaskId`], [`MutationId`] - Identity types
//! - [`Task`], [`SyncStatus`] - The task entity and its per-item sync flag
//! - [`Mutation`] - A queued, not-yet-acknowledged change
//! - [`Command`] - What a presentation layer asks the store to do
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod error;
mod ids;
mod mutation;
mod task;

pub use command::{Command, Filter, NotificationKind};
pub use error::TypesError;
pub use ids::{MutationId, TaskId};
pub use mutation::{Mutation, MutationAction, MutationData};
pub use task::{normalize_text, SyncStatus, Task, TaskStats};
