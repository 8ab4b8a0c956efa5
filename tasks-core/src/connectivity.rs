//! Connectivity state machine for offline-tasks.
//!
//! Combines passive signals from the host environment with the results of
//! active reachability probes into one effective online/offline state:
//! - A passive "offline" signal takes effect immediately (fail fast).
//! - A passive "online" signal is only a hint; it asks for a probe.
//! - Probe results decide the state, unless a passive "offline" arrived
//!   after the probe started. Each passive offline bumps an epoch, and probe
//!   results tagged with an older epoch are discarded.
//!
//! A [`ConnectivityAction::Changed`] is emitted only when the effective
//! state actually flips, so consumers never see duplicate transitions.

use std::fmt;

/// Effective reachability of the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// The remote answered the latest probe.
    Online,
    /// Unknown, unreachable, or reported offline by the host.
    #[default]
    Offline,
}

impl Connectivity {
    /// Check if online.
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    /// Map a reachability flag to a state.
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline => f.write_str("offline"),
        }
    }
}

/// Inputs to the connectivity state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The host reports that the network came back.
    PassiveOnline,
    /// The host reports that the network went away.
    PassiveOffline,
    /// A reachability probe finished.
    ProbeCompleted {
        /// Epoch the probe was started in.
        epoch: u64,
        /// Whether the remote answered in time.
        reachable: bool,
    },
}

/// Actions to be executed by the connectivity monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityAction {
    /// Run a reachability probe tagged with `epoch`.
    Probe {
        /// Epoch to report back in [`Signal::ProbeCompleted`].
        epoch: u64,
    },
    /// The effective state changed; notify consumers.
    Changed(Connectivity),
}

/// Connectivity state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    current: Connectivity,
    epoch: u64,
}

impl ConnectivityState {
    /// Create a state machine that is offline until a probe succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a signal and return the new state plus actions to execute.
    pub fn on_signal(self, signal: Signal) -> (Self, Vec<ConnectivityAction>) {
        match signal {
            Signal::PassiveOnline => (self, vec![ConnectivityAction::Probe { epoch: self.epoch }]),
            Signal::PassiveOffline => {
                let next = Self {
                    current: Connectivity::Offline,
                    epoch: self.epoch.wrapping_add(1),
                };
                (next, self.changed_to(Connectivity::Offline))
            }
            Signal::ProbeCompleted { epoch, .. } if epoch != self.epoch => (self, vec![]),
            Signal::ProbeCompleted { reachable, .. } => {
                let target = Connectivity::from_reachable(reachable);
                let next = Self {
                    current: target,
                    ..self
                };
                (next, self.changed_to(target))
            }
        }
    }

    fn changed_to(&self, target: Connectivity) -> Vec<ConnectivityAction> {
        if self.current == target {
            vec![]
        } else {
            vec![ConnectivityAction::Changed(target)]
        }
    }

    /// The current effective state.
    pub fn current(&self) -> Connectivity {
        self.current
    }

    /// Check if online.
    pub fn is_online(&self) -> bool {
        self.current.is_online()
    }

    /// Epoch to tag a probe started now.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(state: ConnectivityState, reachable: bool) -> (ConnectivityState, Vec<ConnectivityAction>) {
        let epoch = state.epoch();
        state.on_signal(Signal::ProbeCompleted { epoch, reachable })
    }

    #[test]
    fn starts_offline() {
        let state = ConnectivityState::new();
        assert_eq!(state.current(), Connectivity::Offline);
        assert!(!state.is_online());
    }

    #[test]
    fn successful_probe_goes_online() {
        let (state, actions) = probe(ConnectivityState::new(), true);
        assert!(state.is_online());
        assert_eq!(actions, vec![ConnectivityAction::Changed(Connectivity::Online)]);
    }

    #[test]
    fn repeated_probe_results_are_deduplicated() {
        let (state, _) = probe(ConnectivityState::new(), true);
        let (state, actions) = probe(state, true);
        assert!(state.is_online());
        assert!(actions.is_empty());

        let (state, actions) = probe(state, false);
        assert_eq!(actions, vec![ConnectivityAction::Changed(Connectivity::Offline)]);
        let (_, actions) = probe(state, false);
        assert!(actions.is_empty());
    }

    #[test]
    fn failed_probe_while_offline_changes_nothing() {
        let (state, actions) = probe(ConnectivityState::new(), false);
        assert!(!state.is_online());
        assert!(actions.is_empty());
    }

    #[test]
    fn passive_online_only_requests_a_probe() {
        let (state, actions) = ConnectivityState::new().on_signal(Signal::PassiveOnline);
        assert!(!state.is_online());
        assert_eq!(actions, vec![ConnectivityAction::Probe { epoch: 0 }]);
    }

    #[test]
    fn passive_offline_takes_effect_immediately() {
        let (state, _) = probe(ConnectivityState::new(), true);
        let (state, actions) = state.on_signal(Signal::PassiveOffline);

        assert!(!state.is_online());
        assert_eq!(actions, vec![ConnectivityAction::Changed(Connectivity::Offline)]);
    }

    #[test]
    fn passive_offline_while_offline_is_silent() {
        let (state, actions) = ConnectivityState::new().on_signal(Signal::PassiveOffline);
        assert!(!state.is_online());
        assert!(actions.is_empty());
        assert_eq!(state.epoch(), 1);
    }

    #[test]
    fn stale_probe_cannot_undo_passive_offline() {
        let (state, _) = probe(ConnectivityState::new(), true);
        let started_in = state.epoch();

        let (state, _) = state.on_signal(Signal::PassiveOffline);
        let (state, actions) = state.on_signal(Signal::ProbeCompleted {
            epoch: started_in,
            reachable: true,
        });

        assert!(!state.is_online());
        assert!(actions.is_empty());
    }

    #[test]
    fn probe_after_passive_offline_can_restore_online() {
        let (state, _) = probe(ConnectivityState::new(), true);
        let (state, _) = state.on_signal(Signal::PassiveOffline);
        let (state, actions) = probe(state, true);

        assert!(state.is_online());
        assert_eq!(actions, vec![ConnectivityAction::Changed(Connectivity::Online)]);
    }

    #[test]
    fn display() {
        assert_eq!(Connectivity::Online.to_string(), "online");
        assert_eq!(Connectivity::Offline.to_string(), "offline");
    }
}
