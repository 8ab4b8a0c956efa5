//! # tasks-core
//!
//! Pure logic for offline-tasks (no I/O, instant tests).
//!
//! This crate implements the task collection, the pending-mutation queue and
//! the two state machines (queue drain, connectivity) without any network or
//! disk I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. Even the current time is passed in by the caller.
//! This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (remote calls, probes, persistence) is performed by
//! `tasks-client`, which interprets the actions produced by these state
//! machines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connectivity;
pub mod drain;
pub mod queue;
pub mod tasks;

pub use connectivity::{Connectivity, ConnectivityAction, ConnectivityState, Signal};
pub use drain::{Action, DrainEvent, DrainOutcome, DrainState};
pub use queue::MutationQueue;
pub use tasks::TaskList;
