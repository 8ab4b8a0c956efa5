//! TaskStore - the offline-first task collection.
//!
//! This module provides [`TaskStore`], which owns the tasks and the
//! pending-mutation queue, decides per operation whether a change goes to
//! the remote right away or waits in the queue, and replays the queue when
//! connectivity returns.
//!
//! # Architecture
//!
//! The store uses pure state (from tasks-core) for the collection, the queue
//! and the drain protocol, and interprets drain actions to perform the
//! actual I/O through the [`DurableStore`], [`RemoteSync`] and
//! [`Presenter`] traits.
//!
//! ```text
//! Host → TaskStore → DurableStore / RemoteSync / Presenter
//!            ↓
//!       tasks-core (TaskList, MutationQueue, DrainState)
//! ```
//!
//! # Failure policy
//!
//! Nothing here returns an error. Persistence failures are logged and the
//! store carries on in memory; remote failures either leave the queue as it
//! was (drain) or are logged and forgotten (optimistic online writes).
//!
//! # Example
//!
//! ```ignore
//! use tasks_client::{MemoryStore, MockRemote, NoopPresenter, TaskStore};
//!
//! let store = Arc::new(TaskStore::load(MemoryStore::new(), MockRemote::new(), NoopPresenter).await);
//! store.create_task("buy milk").await;      // offline: queued
//! store.set_online(true).await;             // drains in the background
//! store.flush().await;
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tasks_core::{Action, DrainEvent, DrainOutcome, DrainState, MutationQueue, TaskList};
use tasks_types::{Command, Filter, Mutation, SyncStatus, Task, TaskId, TaskStats};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::presenter::{Presenter, TaskView};
use crate::remote::RemoteSync;
use crate::storage::{DurableStore, QUEUE_KEY, TASKS_KEY};

/// Everything guarded by the store lock.
#[derive(Debug, Default)]
struct StoreState {
    tasks: TaskList,
    queue: MutationQueue,
    drain: DrainState,
    online: bool,
    filter: Filter,
    editing: Option<TaskId>,
}

impl StoreState {
    fn view(&self) -> TaskView {
        TaskView {
            tasks: self.tasks.filtered(self.filter),
            stats: self.tasks.stats(),
            filter: self.filter,
            editing: self.editing,
            online: self.online,
            queued: self.queue.len(),
            syncing: self.drain.is_draining(),
        }
    }

    /// Changes to a task wait in the queue while offline, and also while
    /// older changes to the same task are still queued.
    fn must_defer(&self, id: TaskId) -> bool {
        !self.online || self.queue.references(id)
    }

    /// Bring every status in line with the queue: pending iff referenced.
    fn repair_statuses(&mut self) -> usize {
        let mut repaired = 0;
        let ids: Vec<(TaskId, SyncStatus)> =
            self.tasks.iter().map(|t| (t.id, t.sync_status)).collect();
        for (id, status) in ids {
            let expected = if self.queue.references(id) {
                SyncStatus::Pending
            } else {
                SyncStatus::Synced
            };
            if status != expected {
                self.tasks.set_status(id, expected);
                repaired += 1;
            }
        }
        repaired
    }
}

/// Where a drain stands after the store interpreted one batch of actions.
enum Step {
    /// Send this entry to the remote, then report back.
    Replay(Mutation),
    /// The drain is over (or never started).
    Done(Option<DrainOutcome>),
}

/// The offline-first task store.
///
/// Construct once per process and share it by `Arc`.
pub struct TaskStore<S, R, P> {
    storage: S,
    remote: Arc<R>,
    presenter: P,
    state: Mutex<StoreState>,
    background: StdMutex<JoinSet<()>>,
}

impl<S, R, P> TaskStore<S, R, P>
where
    S: DurableStore,
    R: RemoteSync + 'static,
    P: Presenter,
{
    /// Load tasks and queue from `storage` and render once.
    ///
    /// Missing or corrupt values load as empty. The store starts offline;
    /// hosts report connectivity with [`TaskStore::set_online`].
    pub async fn load(storage: S, remote: R, presenter: P) -> Self {
        let tasks: Vec<Task> = read_json(&storage, TASKS_KEY).await.unwrap_or_default();
        let entries: Vec<Mutation> = read_json(&storage, QUEUE_KEY).await.unwrap_or_default();

        let mut state = StoreState {
            tasks: TaskList::from_tasks(tasks),
            queue: MutationQueue::from_entries(entries),
            ..StoreState::default()
        };
        for mutation in state.queue.iter() {
            state.tasks.reserve_id(mutation.task_id());
        }
        let repaired = state.repair_statuses();
        if repaired > 0 {
            tracing::debug!("Repaired sync status of {} task(s) on load", repaired);
        }
        tracing::info!(
            "Loaded {} task(s) and {} queued change(s)",
            state.tasks.len(),
            state.queue.len()
        );

        presenter.render(&state.view());
        Self {
            storage,
            remote: Arc::new(remote),
            presenter,
            state: Mutex::new(state),
            background: StdMutex::new(JoinSet::new()),
        }
    }

    // ===========================================
    // Mutations
    // ===========================================

    /// Create a task from `text`. Blank text is ignored.
    pub async fn create_task(&self, text: &str) -> Option<Task> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let status = SyncStatus::for_connectivity(state.online);

        let Some(task) = state.tasks.create(text, status, now) else {
            tracing::debug!("Ignoring task with blank text");
            return None;
        };
        self.persist_tasks(&state).await;

        let mutation = Mutation::create(task.clone(), now);
        if state.online {
            self.send_optimistic(mutation);
        } else {
            state.queue.push(mutation);
            self.persist_queue(&state).await;
        }

        self.render(&state);
        Some(task)
    }

    /// Flip a task's completed flag. Unknown ids are ignored.
    pub async fn toggle_task(&self, id: TaskId) -> Option<Task> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let defer = state.must_defer(id);

        let task = state.tasks.toggle(id, pending_if(defer), now)?;
        self.persist_tasks(&state).await;
        self.record(&mut state, Mutation::update(task.clone(), now), defer)
            .await;

        self.render(&state);
        Some(task)
    }

    /// Replace a task's text. Unknown ids and blank text are ignored.
    pub async fn edit_task(&self, id: TaskId, text: &str) -> Option<Task> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let defer = state.must_defer(id);

        let Some(task) = state.tasks.edit(id, text, pending_if(defer), now) else {
            tracing::debug!("Ignoring edit of task {}", id);
            return None;
        };
        if state.editing == Some(id) {
            state.editing = None;
        }
        self.persist_tasks(&state).await;
        self.record(&mut state, Mutation::update(task.clone(), now), defer)
            .await;

        self.render(&state);
        Some(task)
    }

    /// Remove a task. Unknown ids are ignored.
    pub async fn delete_task(&self, id: TaskId) -> Option<Task> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let defer = state.must_defer(id);

        let task = state.tasks.remove(id)?;
        if state.editing == Some(id) {
            state.editing = None;
        }
        self.persist_tasks(&state).await;
        self.record(&mut state, Mutation::delete(id, now), defer)
            .await;

        self.render(&state);
        Some(task)
    }

    /// Enter edit mode for a task.
    pub async fn begin_edit(&self, id: TaskId) {
        let mut state = self.state.lock().await;
        if !state.tasks.contains(id) {
            return;
        }
        state.editing = Some(id);
        self.render(&state);
    }

    /// Leave edit mode without changing anything.
    pub async fn cancel_edit(&self) {
        let mut state = self.state.lock().await;
        state.editing = None;
        self.render(&state);
    }

    /// Change which tasks the view shows.
    pub async fn set_filter(&self, filter: Filter) {
        let mut state = self.state.lock().await;
        state.filter = filter;
        self.render(&state);
    }

    /// Route a command from the host.
    pub async fn dispatch(&self, command: Command) {
        tracing::debug!("Dispatching {:?}", command);
        match command {
            Command::Create { text } => {
                self.create_task(&text).await;
            }
            Command::Toggle { id } => {
                self.toggle_task(id).await;
            }
            Command::Delete { id } => {
                self.delete_task(id).await;
            }
            Command::Edit { id, text } => {
                self.edit_task(id, &text).await;
            }
            Command::BeginEdit { id } => self.begin_edit(id).await,
            Command::CancelEdit => self.cancel_edit().await,
            Command::SetFilter { filter } => self.set_filter(filter).await,
            Command::Sync => {
                self.drain().await;
            }
        }
    }

    /// Queue a mutation, or send it right away if it need not wait.
    async fn record(&self, state: &mut StoreState, mutation: Mutation, defer: bool) {
        if defer {
            state.queue.push(mutation);
            self.persist_queue(state).await;
        } else {
            self.send_optimistic(mutation);
        }
    }

    /// Fire-and-forget remote write. Failures are logged, never retried.
    fn send_optimistic(&self, mutation: Mutation) {
        let remote = Arc::clone(&self.remote);
        self.spawn_background(async move {
            let id = mutation.task_id();
            match remote.apply(mutation.action, &mutation.data).await {
                Ok(()) => tracing::debug!("Remote accepted {} of task {}", mutation.action, id),
                Err(e) => tracing::warn!(
                    "Remote rejected {} of task {}, keeping local state: {}",
                    mutation.action,
                    id,
                    e
                ),
            }
        });
    }

    // ===========================================
    // Drain
    // ===========================================

    /// Replay the queue against the remote.
    ///
    /// Returns `None` without side effects if offline, if the queue is
    /// empty, or if a drain is already running. After a successful drain,
    /// changes queued meanwhile are drained too.
    pub async fn drain(&self) -> Option<DrainOutcome> {
        let mut last = None;
        while let Some(outcome) = self.drain_once().await {
            let success = outcome.is_success();
            last = Some(outcome);
            if !success || !self.has_pending_work().await {
                break;
            }
        }
        last
    }

    async fn has_pending_work(&self) -> bool {
        let state = self.state.lock().await;
        state.online && !state.queue.is_empty() && !state.drain.is_draining()
    }

    async fn drain_once(&self) -> Option<DrainOutcome> {
        let mut step = self.advance(None).await;
        loop {
            match step {
                Step::Done(outcome) => return outcome,
                Step::Replay(mutation) => {
                    // The store lock is not held here, so local edits go on
                    // while the remote call is in flight.
                    let event = match self.remote.apply(mutation.action, &mutation.data).await {
                        Ok(()) => DrainEvent::EntrySucceeded,
                        Err(e) => {
                            tracing::warn!(
                                "Replay of {} for task {} failed: {}",
                                mutation.action,
                                mutation.task_id(),
                                e
                            );
                            DrainEvent::EntryFailed {
                                error: e.to_string(),
                            }
                        }
                    };
                    step = self.advance(Some(event)).await;
                }
            }
        }
    }

    /// Feed an event to the drain machine and execute the resulting
    /// actions. `None` requests a drain with the current online flag and
    /// queue length.
    async fn advance(&self, event: Option<DrainEvent>) -> Step {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let mut event = event.unwrap_or(DrainEvent::Requested {
            online: state.online,
            queued: state.queue.len(),
        });
        let mut outcome = None;
        let mut changed = false;

        loop {
            let (next, actions) = std::mem::take(&mut state.drain).on_event(event);
            state.drain = next;
            changed |= !actions.is_empty();

            let mut replay = None;
            let mut tasks_dirty = false;
            for action in actions {
                match action {
                    Action::SetSyncing(syncing) => self.presenter.set_syncing(syncing),
                    Action::Replay { index } => replay = Some(index),
                    Action::MarkSynced { index } => {
                        tasks_dirty |= mark_synced(state, index);
                    }
                    Action::Commit { count } => {
                        state.queue.commit(count);
                        self.persist_queue(state).await;
                        tasks_dirty = true;
                    }
                    Action::Notify(result) => {
                        if result.is_success() {
                            tracing::info!("{}", result.message());
                        } else {
                            tracing::warn!("{}", result.message());
                        }
                        self.presenter.notify(&result.message(), result.kind());
                        outcome = Some(result);
                    }
                }
            }
            if tasks_dirty {
                self.persist_tasks(state).await;
            }

            let Some(index) = replay else { break };
            match state.queue.get(index) {
                Some(mutation) => {
                    if changed {
                        self.render(state);
                    }
                    return Step::Replay(mutation.clone());
                }
                None => {
                    tracing::error!("Queue entry {} missing during drain", index);
                    event = DrainEvent::EntryFailed {
                        error: format!("queue entry {} missing", index),
                    };
                }
            }
        }

        if changed {
            self.render(state);
        }
        Step::Done(outcome)
    }

    // ===========================================
    // Connectivity
    // ===========================================

    /// Record the effective connectivity. A transition to online starts a
    /// drain in the background; repeated reports of the same state do
    /// nothing.
    pub async fn set_online(self: &Arc<Self>, online: bool)
    where
        S: 'static,
        P: 'static,
    {
        {
            let mut state = self.state.lock().await;
            if state.online == online {
                return;
            }
            state.online = online;
            tracing::info!(
                "Task store is now {}",
                if online { "online" } else { "offline" }
            );
            self.presenter.set_online(online);
            self.render(&state);
        }

        if online {
            let store = Arc::clone(self);
            self.spawn_background(async move {
                store.drain().await;
            });
        }
    }

    /// Wait for every background remote call (and background drain) to
    /// finish, including ones started while waiting.
    pub async fn flush(&self) {
        loop {
            let mut pending = {
                let mut background = self.background.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *background)
            };
            if pending.is_empty() {
                return;
            }
            while let Some(result) = pending.join_next().await {
                if let Err(e) = result {
                    tracing::error!("Background task failed: {}", e);
                }
            }
        }
    }

    fn spawn_background<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut background = self.background.lock().unwrap_or_else(PoisonError::into_inner);
        while background.try_join_next().is_some() {}
        background.spawn(future);
    }

    // ===========================================
    // Queries
    // ===========================================

    /// Snapshot of what the presenter was last given.
    pub async fn view(&self) -> TaskView {
        self.state.lock().await.view()
    }

    /// All tasks, most recent first (ignores the filter).
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.tasks().to_vec()
    }

    /// Look up one task.
    pub async fn task(&self, id: TaskId) -> Option<Task> {
        self.state.lock().await.tasks.get(id).cloned()
    }

    /// Queued mutations in replay order.
    pub async fn queue(&self) -> Vec<Mutation> {
        self.state.lock().await.queue.entries()
    }

    /// Number of queued mutations.
    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Task counters.
    pub async fn stats(&self) -> TaskStats {
        self.state.lock().await.tasks.stats()
    }

    /// Effective connectivity as last reported.
    pub async fn is_online(&self) -> bool {
        self.state.lock().await.online
    }

    /// Whether a drain is running.
    pub async fn is_syncing(&self) -> bool {
        self.state.lock().await.drain.is_draining()
    }

    // ===========================================
    // Persistence and rendering
    // ===========================================

    async fn persist_tasks(&self, state: &StoreState) {
        self.persist(TASKS_KEY, state.tasks.tasks()).await;
    }

    async fn persist_queue(&self, state: &StoreState) {
        self.persist(QUEUE_KEY, &state.queue.entries()).await;
    }

    async fn persist<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.storage.set(key, &json).await {
            tracing::warn!("Failed to persist {}, continuing in memory: {}", key, e);
        }
    }

    fn render(&self, state: &StoreState) {
        self.presenter.render(&state.view());
    }
}

/// Mark the task behind queue entry `index` synced, unless a later entry
/// still targets it or the task is gone. Returns true if a task changed.
fn mark_synced(state: &mut StoreState, index: usize) -> bool {
    let Some(id) = state.queue.get(index).map(Mutation::task_id) else {
        return false;
    };
    if state.queue.references_after(index, id) {
        return false;
    }
    state.tasks.set_status(id, SyncStatus::Synced)
}

fn pending_if(defer: bool) -> SyncStatus {
    if defer {
        SyncStatus::Pending
    } else {
        SyncStatus::Synced
    }
}

/// Read and parse a stored value. Unreadable or corrupt values are logged
/// and treated as absent.
async fn read_json<S, T>(storage: &S, key: &str) -> Option<T>
where
    S: DurableStore,
    T: DeserializeOwned,
{
    match storage.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding corrupt {} value: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", key, e);
            None
        }
    }
}
