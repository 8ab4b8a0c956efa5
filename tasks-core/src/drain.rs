//! Drain state machine for offline-tasks.
//!
//! This module provides a pure, side-effect-free state machine for replaying
//! the pending-mutation queue. The state machine takes events as input and
//! produces a new state plus a list of actions to execute.
//!
//! The actual I/O (remote calls, persistence, notifications) is performed by
//! tasks-client, not by this module. Replay is strictly sequential: the
//! machine asks for one entry at a time and only asks for the next one after
//! the previous call reported back.

use tasks_types::NotificationKind;

/// Drain state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DrainState {
    /// No drain running.
    #[default]
    Idle,
    /// Replaying the first `total` queue entries.
    Draining {
        /// Size of the batch captured when the drain started.
        total: usize,
        /// Entries accepted by the remote so far.
        replayed: usize,
    },
}

impl DrainState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (tasks-client)
    /// is responsible for executing the returned actions in order.
    pub fn on_event(self, event: DrainEvent) -> (Self, Vec<Action>) {
        match (self, event) {
            // From Idle
            (Self::Idle, DrainEvent::Requested { online: true, queued }) if queued > 0 => (
                Self::Draining {
                    total: queued,
                    replayed: 0,
                },
                vec![Action::SetSyncing(true), Action::Replay { index: 0 }],
            ),

            // From Draining
            (Self::Draining { total, replayed }, DrainEvent::EntrySucceeded) => {
                let next = replayed + 1;
                if next >= total {
                    (
                        Self::Idle,
                        vec![
                            Action::MarkSynced { index: replayed },
                            Action::Commit { count: total },
                            Action::Notify(DrainOutcome::Completed { replayed: total }),
                            Action::SetSyncing(false),
                        ],
                    )
                } else {
                    (
                        Self::Draining {
                            total,
                            replayed: next,
                        },
                        vec![
                            Action::MarkSynced { index: replayed },
                            Action::Replay { index: next },
                        ],
                    )
                }
            }
            (Self::Draining { total, replayed }, DrainEvent::EntryFailed { error }) => (
                Self::Idle,
                vec![
                    Action::Notify(DrainOutcome::Failed {
                        replayed,
                        total,
                        error,
                    }),
                    Action::SetSyncing(false),
                ],
            ),

            // Offline, empty queue, already draining, stray results - stay put
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a drain is running.
    pub fn is_draining(&self) -> bool {
        matches!(self, Self::Draining { .. })
    }
}

/// Events that drive the drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainEvent {
    /// Someone asked for a drain (reconnect or manual sync).
    Requested {
        /// Effective connectivity at the time of the request.
        online: bool,
        /// Current queue length.
        queued: usize,
    },
    /// The remote accepted the entry most recently handed out.
    EntrySucceeded,
    /// The remote rejected the entry most recently handed out.
    EntryFailed {
        /// Error message describing the failure.
        error: String,
    },
}

/// Actions to be executed by tasks-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show or hide the sync-in-progress indicator.
    SetSyncing(bool),
    /// Send the queue entry at `index` to the remote and report back.
    Replay {
        /// Position in the queue.
        index: usize,
    },
    /// The entry at `index` was accepted; mark its task synced if it is still
    /// present and no later entry of the batch targets it.
    MarkSynced {
        /// Position in the queue.
        index: usize,
    },
    /// Remove the first `count` entries from the queue and persist.
    Commit {
        /// Size of the drained batch.
        count: usize,
    },
    /// Surface the result of the drain.
    Notify(DrainOutcome),
}

/// How a drain ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every entry was accepted and the batch was removed.
    Completed {
        /// Number of entries replayed.
        replayed: usize,
    },
    /// A call failed; the queue was left as it was.
    Failed {
        /// Entries accepted before the failure.
        replayed: usize,
        /// Size of the batch.
        total: usize,
        /// Error message describing the failure.
        error: String,
    },
}

impl DrainOutcome {
    /// Notification severity for this outcome.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Completed { .. } => NotificationKind::Success,
            Self::Failed { .. } => NotificationKind::Error,
        }
    }

    /// User-facing message for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Completed { replayed: 1 } => "Synced 1 offline change".to_string(),
            Self::Completed { replayed } => format!("Synced {} offline changes", replayed),
            Self::Failed { total, error, .. } => format!(
                "Sync failed ({}); {} change(s) kept for retry",
                error, total
            ),
        }
    }

    /// Check if the drain completed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(online: bool, queued: usize) -> DrainEvent {
        DrainEvent::Requested { online, queued }
    }

    // ===========================================
    // Starting
    // ===========================================

    #[test]
    fn starts_idle() {
        let state = DrainState::new();
        assert_eq!(state, DrainState::Idle);
        assert!(!state.is_draining());
    }

    #[test]
    fn request_online_with_entries_starts_drain() {
        let (state, actions) = DrainState::new().on_event(request(true, 3));

        assert_eq!(
            state,
            DrainState::Draining {
                total: 3,
                replayed: 0
            }
        );
        assert_eq!(
            actions,
            vec![Action::SetSyncing(true), Action::Replay { index: 0 }]
        );
    }

    #[test]
    fn request_with_empty_queue_is_no_op() {
        let (state, actions) = DrainState::new().on_event(request(true, 0));
        assert_eq!(state, DrainState::Idle);
        assert!(actions.is_empty());
    }

    #[test]
    fn request_while_offline_is_no_op() {
        let (state, actions) = DrainState::new().on_event(request(false, 2));
        assert_eq!(state, DrainState::Idle);
        assert!(actions.is_empty());
    }

    #[test]
    fn request_while_draining_is_ignored() {
        let (state, _) = DrainState::new().on_event(request(true, 2));
        let (state, actions) = state.on_event(request(true, 5));

        assert_eq!(
            state,
            DrainState::Draining {
                total: 2,
                replayed: 0
            }
        );
        assert!(actions.is_empty());
    }

    // ===========================================
    // Replaying
    // ===========================================

    #[test]
    fn entries_are_replayed_one_at_a_time_in_order() {
        let (state, _) = DrainState::new().on_event(request(true, 3));

        let (state, actions) = state.on_event(DrainEvent::EntrySucceeded);
        assert_eq!(
            actions,
            vec![Action::MarkSynced { index: 0 }, Action::Replay { index: 1 }]
        );

        let (_, actions) = state.on_event(DrainEvent::EntrySucceeded);
        assert_eq!(
            actions,
            vec![Action::MarkSynced { index: 1 }, Action::Replay { index: 2 }]
        );
    }

    #[test]
    fn last_success_commits_whole_batch() {
        let (state, _) = DrainState::new().on_event(request(true, 2));
        let (state, _) = state.on_event(DrainEvent::EntrySucceeded);
        let (state, actions) = state.on_event(DrainEvent::EntrySucceeded);

        assert_eq!(state, DrainState::Idle);
        assert_eq!(
            actions,
            vec![
                Action::MarkSynced { index: 1 },
                Action::Commit { count: 2 },
                Action::Notify(DrainOutcome::Completed { replayed: 2 }),
                Action::SetSyncing(false),
            ]
        );
    }

    #[test]
    fn failure_aborts_without_commit() {
        let (state, _) = DrainState::new().on_event(request(true, 3));
        let (state, _) = state.on_event(DrainEvent::EntrySucceeded);
        let (state, actions) = state.on_event(DrainEvent::EntryFailed {
            error: "503".into(),
        });

        assert_eq!(state, DrainState::Idle);
        assert!(!actions.iter().any(|a| matches!(a, Action::Commit { .. })));
        assert_eq!(
            actions,
            vec![
                Action::Notify(DrainOutcome::Failed {
                    replayed: 1,
                    total: 3,
                    error: "503".into()
                }),
                Action::SetSyncing(false),
            ]
        );
    }

    #[test]
    fn drain_can_restart_after_failure() {
        let (state, _) = DrainState::new().on_event(request(true, 1));
        let (state, _) = state.on_event(DrainEvent::EntryFailed { error: "x".into() });
        let (state, actions) = state.on_event(request(true, 1));

        assert!(state.is_draining());
        assert_eq!(actions[1], Action::Replay { index: 0 });
    }

    #[test]
    fn stray_results_while_idle_are_ignored() {
        let (state, actions) = DrainState::new().on_event(DrainEvent::EntrySucceeded);
        assert_eq!(state, DrainState::Idle);
        assert!(actions.is_empty());

        let (state, actions) = state.on_event(DrainEvent::EntryFailed { error: "x".into() });
        assert_eq!(state, DrainState::Idle);
        assert!(actions.is_empty());
    }

    #[test]
    fn syncing_indicator_always_cleared_on_exit() {
        for fail in [false, true] {
            let (mut state, _) = DrainState::new().on_event(request(true, 1));
            let event = if fail {
                DrainEvent::EntryFailed { error: "x".into() }
            } else {
                DrainEvent::EntrySucceeded
            };
            let (next, actions) = state.on_event(event);
            state = next;

            assert_eq!(state, DrainState::Idle);
            assert_eq!(actions.last(), Some(&Action::SetSyncing(false)));
        }
    }

    // ===========================================
    // Outcomes
    // ===========================================

    #[test]
    fn outcome_kinds_and_messages() {
        let ok = DrainOutcome::Completed { replayed: 1 };
        assert!(ok.is_success());
        assert_eq!(ok.kind(), NotificationKind::Success);
        assert_eq!(ok.message(), "Synced 1 offline change");
        assert_eq!(
            DrainOutcome::Completed { replayed: 4 }.message(),
            "Synced 4 offline changes"
        );

        let failed = DrainOutcome::Failed {
            replayed: 1,
            total: 2,
            error: "timeout".into(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.kind(), NotificationKind::Error);
        assert!(failed.message().contains("2 change(s) kept"));
    }
}
