//! # tasks-client
//!
//! Offline-first task store for offline-tasks.
//!
//! This is the library hosts use to keep a task list usable without
//! network connectivity and to reconcile local edits with a remote service
//! once connectivity returns.
//!
//! ## Features
//!
//! - **Optimistic local writes**: every change is visible and persisted
//!   locally before any network attempt
//! - **Durable mutation queue**: offline changes survive restarts and are
//!   replayed strictly in order
//! - **All-or-nothing drain**: a failed replay leaves the queue untouched
//! - **Active connectivity checks**: passive signals are confirmed with
//!   bounded reachability probes
//! - **Pluggable backends**: memory, file and SQLite storage; mock,
//!   simulated and HTTP remotes
//! - **Pure State Machines**: uses tasks-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tasks_client::{
//!     ConnectivityMonitor, FileStore, HttpProber, ProbeConfig, SimulatedRemote, TaskStore,
//! };
//!
//! let store = Arc::new(TaskStore::load(FileStore::open(dir).await?, remote, presenter).await);
//! let monitor = Arc::new(ConnectivityMonitor::new(prober, ProbeConfig::default()));
//! monitor.spawn();
//! monitor.spawn_sync_driver(Arc::clone(&store));
//!
//! store.create_task("buy milk").await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connectivity;
pub mod error;
pub mod presenter;
pub mod remote;
pub mod storage;
pub mod store;

pub use config::{
    Config, ConfigError, ConnectivityConfig, RemoteBackend, RemoteConfig, StorageBackend,
    StorageConfig,
};
pub use connectivity::{
    AlwaysReachable, ConnectivityMonitor, HttpProber, MockProber, ProbeConfig, Prober,
};
pub use error::{RemoteError, RemoteResult, StorageError, StorageResult};
pub use presenter::{NoopPresenter, Presenter, RecordingPresenter, TaskView};
pub use remote::{HttpRemote, MockRemote, RemoteCall, RemoteSync, SimulatedRemote};
pub use storage::{DurableStore, FileStore, MemoryStore, SqliteStore, QUEUE_KEY, TASKS_KEY};
pub use store::TaskStore;

// Re-exported so hosts depend on one crate.
pub use tasks_core::{Connectivity, DrainOutcome};
pub use tasks_types::{
    Command, Filter, Mutation, MutationAction, NotificationKind, SyncStatus, Task, TaskId,
    TaskStats,
};
