//! Presentation callbacks.
//!
//! The task store knows nothing about how tasks are shown. After every
//! change it hands a [`TaskView`] snapshot to a [`Presenter`], and it
//! reports drain progress and outcomes through the same trait.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tasks_types::{Filter, NotificationKind, Task, TaskId, TaskStats};

/// Everything a host needs to draw the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Tasks passing the current filter, most recent first.
    pub tasks: Vec<Task>,
    /// Counts over all tasks (not just the filtered ones).
    pub stats: TaskStats,
    /// Active filter.
    pub filter: Filter,
    /// Task currently being edited, if any.
    pub editing: Option<TaskId>,
    /// Effective connectivity as last reported to the store.
    pub online: bool,
    /// Number of queued mutations.
    pub queued: usize,
    /// Whether a drain is running.
    pub syncing: bool,
}

/// Callbacks from the task store to the host.
///
/// Called synchronously while the store holds its state lock; keep
/// implementations quick and never call back into the store.
pub trait Presenter: Send + Sync {
    /// Redraw from `view`.
    fn render(&self, view: &TaskView);

    /// Show a toast-style message.
    fn notify(&self, message: &str, kind: NotificationKind);

    /// Show or hide the sync-in-progress indicator.
    fn set_syncing(&self, syncing: bool);

    /// Effective connectivity changed.
    fn set_online(&self, _online: bool) {}
}

/// Presenter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn render(&self, _view: &TaskView) {}

    fn notify(&self, _message: &str, _kind: NotificationKind) {}

    fn set_syncing(&self, _syncing: bool) {}
}

/// Presenter that records every call. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    renders: Vec<TaskView>,
    notifications: Vec<(String, NotificationKind)>,
    syncing: Vec<bool>,
    online: Vec<bool>,
}

impl RecordingPresenter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.inner.lock().unwrap().renders.len()
    }

    /// The most recent view.
    pub fn last_view(&self) -> Option<TaskView> {
        self.inner.lock().unwrap().renders.last().cloned()
    }

    /// All notifications, in order.
    pub fn notifications(&self) -> Vec<(String, NotificationKind)> {
        self.inner.lock().unwrap().notifications.clone()
    }

    /// All sync-indicator changes, in order.
    pub fn syncing_changes(&self) -> Vec<bool> {
        self.inner.lock().unwrap().syncing.clone()
    }

    /// All connectivity changes, in order.
    pub fn online_changes(&self) -> Vec<bool> {
        self.inner.lock().unwrap().online.clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        *self.inner.lock().unwrap() = RecordingInner::default();
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, view: &TaskView) {
        self.inner.lock().unwrap().renders.push(view.clone());
    }

    fn notify(&self, message: &str, kind: NotificationKind) {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push((message.to_string(), kind));
    }

    fn set_syncing(&self, syncing: bool) {
        self.inner.lock().unwrap().syncing.push(syncing);
    }

    fn set_online(&self, online: bool) {
        self.inner.lock().unwrap().online.push(online);
    }
}
