//! Console presenter.

use std::fmt::Write as _;
use tasks_client::{NotificationKind, Presenter, SyncStatus, TaskView};

/// Presenter that writes to stdout.
///
/// In live mode (the interactive session) every render redraws the list;
/// one-shot commands only print notifications and draw once at the end.
#[derive(Debug, Clone, Copy)]
pub struct ConsolePresenter {
    live: bool,
}

impl ConsolePresenter {
    /// Presenter for one-shot commands.
    pub fn quiet() -> Self {
        Self { live: false }
    }

    /// Presenter for the interactive session.
    pub fn live() -> Self {
        Self { live: true }
    }
}

impl Presenter for ConsolePresenter {
    fn render(&self, view: &TaskView) {
        if self.live {
            print!("{}", format_view(view));
        }
    }

    fn notify(&self, message: &str, kind: NotificationKind) {
        println!("[{}] {}", kind, message);
    }

    fn set_syncing(&self, syncing: bool) {
        if self.live && syncing {
            println!("Syncing offline changes...");
        }
    }

    fn set_online(&self, online: bool) {
        if self.live {
            println!("Connection: {}", if online { "online" } else { "offline" });
        }
    }
}

/// Render a view as text.
pub fn format_view(view: &TaskView) -> String {
    let mut out = String::new();
    let stats = view.stats;
    let _ = writeln!(
        out,
        "Tasks ({}): {} total, {} active, {} completed, {} pending",
        view.filter, stats.total, stats.active, stats.completed, stats.pending
    );

    if view.tasks.is_empty() {
        out.push_str("  (no tasks)\n");
    }
    for task in &view.tasks {
        let check = if task.completed { "x" } else { " " };
        let editing = if view.editing == Some(task.id) {
            "  (editing)"
        } else {
            ""
        };
        let pending = match task.sync_status {
            SyncStatus::Pending => "  (pending)",
            SyncStatus::Synced => "",
        };
        let _ = writeln!(
            out,
            "  [{}] {}  {}{}{}",
            check, task.id, task.text, pending, editing
        );
    }

    let _ = writeln!(
        out,
        "{}{}, {} change(s) queued",
        if view.online { "online" } else { "offline" },
        if view.syncing { ", syncing" } else { "" },
        view.queued
    );
    out
}
