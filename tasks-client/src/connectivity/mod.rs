//! Connectivity monitor.
//!
//! Drives the pure [`ConnectivityState`] machine with real probes and
//! timers:
//! - [`ConnectivityMonitor::spawn`] probes immediately, then on a fixed
//!   interval for as long as the task runs.
//! - [`ConnectivityMonitor::report_online`] / [`report_offline`] feed
//!   passive signals from the host.
//! - Consumers [`subscribe`] to a watch channel that changes only on
//!   effective transitions.
//!
//! [`report_offline`]: ConnectivityMonitor::report_offline
//! [`subscribe`]: ConnectivityMonitor::subscribe

mod http;
mod mock;

pub use http::HttpProber;
pub use mock::MockProber;

use crate::config::ConnectivityConfig;
use crate::presenter::Presenter;
use crate::remote::RemoteSync;
use crate::storage::DurableStore;
use crate::store::TaskStore;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tasks_core::{Connectivity, ConnectivityAction, ConnectivityState, Signal};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// An active reachability check.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Return true if the remote answered. Must not panic; network failures
    /// are `false`.
    async fn probe(&self) -> bool;
}

#[async_trait]
impl<T: Prober + ?Sized> Prober for Box<T> {
    async fn probe(&self) -> bool {
        (**self).probe().await
    }
}

/// Prober for hosts without a probe endpoint: the remote is assumed
/// reachable, so only passive offline signals take the monitor offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

#[async_trait]
impl Prober for AlwaysReachable {
    async fn probe(&self) -> bool {
        true
    }
}

/// Probe timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Interval between periodic probes.
    pub interval: Duration,
    /// Upper bound on a single probe; exceeding it counts as unreachable.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::from(&ConnectivityConfig::default())
    }
}

impl From<&ConnectivityConfig> for ProbeConfig {
    fn from(config: &ConnectivityConfig) -> Self {
        Self {
            interval: config.probe_interval(),
            timeout: config.probe_timeout(),
        }
    }
}

/// Single source of truth for "can we reach the remote right now".
pub struct ConnectivityMonitor<P> {
    prober: P,
    config: ProbeConfig,
    state: Mutex<ConnectivityState>,
    tx: watch::Sender<Connectivity>,
}

impl<P: Prober> ConnectivityMonitor<P> {
    /// Create a monitor. It reports offline until the first probe succeeds.
    pub fn new(prober: P, config: ProbeConfig) -> Self {
        let state = ConnectivityState::new();
        let (tx, _rx) = watch::channel(state.current());
        Self {
            prober,
            config,
            state: Mutex::new(state),
            tx,
        }
    }

    /// Current effective state.
    pub fn current(&self) -> Connectivity {
        self.lock_state().current()
    }

    /// Check if currently online.
    pub fn is_online(&self) -> bool {
        self.current().is_online()
    }

    /// Receive effective transitions.
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }

    /// Run one bounded reachability probe and apply its result.
    ///
    /// Returns what the prober saw. The result is discarded (and the state
    /// left alone) if a passive offline arrived while the probe ran.
    pub async fn probe(&self) -> bool {
        let epoch = self.lock_state().epoch();
        self.probe_in(epoch).await
    }

    /// Passive "online" signal from the host. Runs a probe; the state only
    /// changes if the remote answers.
    pub async fn report_online(&self) {
        for action in self.signal(Signal::PassiveOnline) {
            if let ConnectivityAction::Probe { epoch } = action {
                self.probe_in(epoch).await;
            }
        }
    }

    /// Passive "offline" signal from the host. Takes effect immediately.
    pub fn report_offline(&self) {
        self.signal(Signal::PassiveOffline);
    }

    async fn probe_in(&self, epoch: u64) -> bool {
        let reachable = match tokio::time::timeout(self.config.timeout, self.prober.probe()).await
        {
            Ok(reachable) => reachable,
            Err(_) => {
                tracing::debug!("Probe timed out after {:?}", self.config.timeout);
                false
            }
        };
        self.signal(Signal::ProbeCompleted { epoch, reachable });
        reachable
    }

    /// Feed a signal through the state machine, publish transitions, and
    /// hand back any probe requests.
    fn signal(&self, signal: Signal) -> Vec<ConnectivityAction> {
        let mut state = self.lock_state();
        let (next, actions) = state.on_signal(signal);
        *state = next;

        let mut pending = Vec::new();
        for action in actions {
            match action {
                ConnectivityAction::Changed(connectivity) => {
                    tracing::info!("Connectivity changed: {}", connectivity);
                    self.tx.send_replace(connectivity);
                }
                probe @ ConnectivityAction::Probe { .. } => pending.push(probe),
            }
        }
        pending
    }

    fn lock_state(&self) -> MutexGuard<'_, ConnectivityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: Prober + 'static> ConnectivityMonitor<P> {
    /// Spawn the periodic probe loop: one probe now, then one per interval.
    ///
    /// Abort the returned handle to stop probing.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        let period = monitor.config.interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                monitor.probe().await;
            }
        })
    }

    /// Forward every transition into `store`, starting with the current
    /// state. The store starts a drain on each transition to online.
    pub fn spawn_sync_driver<S, R, Pr>(&self, store: Arc<TaskStore<S, R, Pr>>) -> JoinHandle<()>
    where
        S: DurableStore + 'static,
        R: RemoteSync + 'static,
        Pr: Presenter + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            let initial = rx.borrow_and_update().is_online();
            store.set_online(initial).await;

            while rx.changed().await.is_ok() {
                let online = rx.borrow_and_update().is_online();
                store.set_online(online).await;
            }
            tracing::debug!("Connectivity monitor dropped, sync driver stopping");
        })
    }
}
