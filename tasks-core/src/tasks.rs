//! In-memory task collection.
//!
//! Tasks are kept most-recent-first. Every mutating method takes `now` so the
//! collection stays deterministic under test; the caller decides the sync
//! status a changed task gets.

use chrono::{DateTime, Utc};
use tasks_types::{normalize_text, Filter, SyncStatus, Task, TaskId, TaskStats};

/// The task collection owned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    last_id: Option<TaskId>,
}

impl TaskList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from persisted tasks, keeping their order.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_id = tasks.iter().map(|t| t.id).max();
        Self { tasks, last_id }
    }

    /// Never issue `id` or anything below it again.
    ///
    /// Used for ids that outlive their task, such as a queued delete.
    pub fn reserve_id(&mut self, id: TaskId) {
        if self.last_id.map_or(true, |last| last < id) {
            self.last_id = Some(id);
        }
    }

    /// Allocate the id for a task created at `now`.
    ///
    /// Ids are millisecond timestamps, bumped past the last issued id so they
    /// stay strictly increasing even within one millisecond or after a clock
    /// step backwards.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> TaskId {
        let candidate = TaskId::new(now.timestamp_millis().max(0) as u64);
        let id = match self.last_id {
            Some(last) if last >= candidate => last.next(),
            _ => candidate,
        };
        self.last_id = Some(id);
        id
    }

    /// Insert a new task at the front.
    ///
    /// Returns `None` (and changes nothing) if `text` is blank.
    pub fn create(&mut self, text: &str, status: SyncStatus, now: DateTime<Utc>) -> Option<Task> {
        normalize_text(text)?;
        let id = self.next_id(now);
        let task = Task::new(id, text, status, now)?;
        self.tasks.insert(0, task.clone());
        Some(task)
    }

    /// Flip a task's completed flag.
    ///
    /// Returns the updated snapshot, or `None` if `id` is unknown.
    pub fn toggle(&mut self, id: TaskId, status: SyncStatus, now: DateTime<Utc>) -> Option<Task> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        task.last_modified = now;
        task.sync_status = status;
        Some(task.clone())
    }

    /// Replace a task's text.
    ///
    /// Returns `None` if `id` is unknown or `text` is blank; the task is left
    /// untouched in both cases.
    pub fn edit(
        &mut self,
        id: TaskId,
        text: &str,
        status: SyncStatus,
        now: DateTime<Utc>,
    ) -> Option<Task> {
        let text = normalize_text(text)?;
        let task = self.get_mut(id)?;
        task.text = text;
        task.last_modified = now;
        task.sync_status = status;
        Some(task.clone())
    }

    /// Remove a task, returning it if it existed.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Set the sync status of a task. Returns false if `id` is unknown.
    pub fn set_status(&mut self, id: TaskId, status: SyncStatus) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.sync_status = status;
                true
            }
            None => false,
        }
    }

    /// Look up a task.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Check if a task exists.
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// All tasks, most recent first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterate tasks, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Clone the tasks passing `filter`.
    pub fn filtered(&self, filter: Filter) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Count tasks by state.
    pub fn stats(&self) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let pending = self
            .tasks
            .iter()
            .filter(|t| t.sync_status.is_pending())
            .count();
        TaskStats {
            total: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    // ===========================================
    // Creation and Ids
    // ===========================================

    #[test]
    fn create_inserts_most_recent_first() {
        let mut list = TaskList::new();
        list.create("first", SyncStatus::Synced, t0()).unwrap();
        list.create("second", SyncStatus::Synced, t0() + Duration::seconds(1))
            .unwrap();

        let texts: Vec<_> = list.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn create_rejects_blank_text() {
        let mut list = TaskList::new();
        assert!(list.create("   ", SyncStatus::Synced, t0()).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn blank_create_does_not_consume_an_id() {
        let mut list = TaskList::new();
        list.create("", SyncStatus::Synced, t0());
        let task = list.create("real", SyncStatus::Synced, t0()).unwrap();
        assert_eq!(task.id.value(), t0().timestamp_millis() as u64);
    }

    #[test]
    fn ids_are_millisecond_timestamps() {
        let mut list = TaskList::new();
        let task = list.create("a", SyncStatus::Synced, t0()).unwrap();
        assert_eq!(task.id.value(), t0().timestamp_millis() as u64);
    }

    #[test]
    fn ids_stay_strictly_increasing_within_a_millisecond() {
        let mut list = TaskList::new();
        let a = list.create("a", SyncStatus::Synced, t0()).unwrap();
        let b = list.create("b", SyncStatus::Synced, t0()).unwrap();
        let c = list.create("c", SyncStatus::Synced, t0() - Duration::seconds(5)).unwrap();

        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn from_tasks_continues_after_highest_id() {
        let mut original = TaskList::new();
        let a = original.create("a", SyncStatus::Synced, t0()).unwrap();

        let mut reloaded = TaskList::from_tasks(original.tasks().to_vec());
        let b = reloaded.create("b", SyncStatus::Synced, t0()).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn reserved_id_is_never_reissued() {
        let later = TaskId::new(t0().timestamp_millis() as u64 + 60_000);
        let mut list = TaskList::new();
        list.reserve_id(later);
        list.reserve_id(TaskId::new(1));

        let task = list.create("after clock step", SyncStatus::Synced, t0()).unwrap();
        assert_eq!(task.id, later.next());
    }

    // ===========================================
    // Mutations
    // ===========================================

    #[test]
    fn toggle_flips_and_refreshes_last_modified() {
        let mut list = TaskList::new();
        let task = list.create("a", SyncStatus::Synced, t0()).unwrap();
        let later = t0() + Duration::minutes(1);

        let toggled = list.toggle(task.id, SyncStatus::Pending, later).unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.last_modified, later);
        assert_eq!(toggled.created_at, t0());
        assert_eq!(toggled.sync_status, SyncStatus::Pending);

        let again = list.toggle(task.id, SyncStatus::Synced, later).unwrap();
        assert!(!again.completed);
    }

    #[test]
    fn toggle_unknown_id_is_no_op() {
        let mut list = TaskList::new();
        list.create("a", SyncStatus::Synced, t0()).unwrap();
        let before = list.clone();

        assert!(list.toggle(TaskId::new(1), SyncStatus::Pending, t0()).is_none());
        assert_eq!(list, before);
    }

    #[test]
    fn edit_replaces_trimmed_text() {
        let mut list = TaskList::new();
        let task = list.create("a", SyncStatus::Synced, t0()).unwrap();

        let edited = list
            .edit(task.id, "  b  ", SyncStatus::Synced, t0() + Duration::seconds(1))
            .unwrap();
        assert_eq!(edited.text, "b");
    }

    #[test]
    fn edit_with_blank_text_leaves_task_unchanged() {
        let mut list = TaskList::new();
        let task = list.create("a", SyncStatus::Synced, t0()).unwrap();

        assert!(list
            .edit(task.id, "   ", SyncStatus::Pending, t0() + Duration::seconds(1))
            .is_none());
        assert_eq!(list.get(task.id), Some(&task));
    }

    #[test]
    fn remove_returns_removed_task() {
        let mut list = TaskList::new();
        let task = list.create("a", SyncStatus::Synced, t0()).unwrap();

        assert_eq!(list.remove(task.id), Some(task.clone()));
        assert!(!list.contains(task.id));
        assert!(list.remove(task.id).is_none());
    }

    #[test]
    fn set_status_reports_unknown_ids() {
        let mut list = TaskList::new();
        let task = list.create("a", SyncStatus::Pending, t0()).unwrap();

        assert!(list.set_status(task.id, SyncStatus::Synced));
        assert_eq!(list.get(task.id).unwrap().sync_status, SyncStatus::Synced);
        assert!(!list.set_status(TaskId::new(1), SyncStatus::Synced));
    }

    // ===========================================
    // Views
    // ===========================================

    #[test]
    fn stats_and_filters() {
        let mut list = TaskList::new();
        let a = list.create("a", SyncStatus::Pending, t0()).unwrap();
        list.create("b", SyncStatus::Synced, t0()).unwrap();
        list.toggle(a.id, SyncStatus::Pending, t0()).unwrap();

        let stats = list.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);

        assert_eq!(list.filtered(Filter::All).len(), 2);
        assert_eq!(list.filtered(Filter::Completed)[0].id, a.id);
        assert_eq!(list.filtered(Filter::Active)[0].text, "b");
    }
}
