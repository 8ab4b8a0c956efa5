//! CLI command implementations.

pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod session;
pub mod status;
pub mod sync;
pub mod toggle;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tasks_client::{
    remote, storage, AlwaysReachable, Config, ConnectivityMonitor, DurableStore, HttpProber,
    ProbeConfig, Prober, RemoteSync, TaskStore,
};

use crate::console::{format_view, ConsolePresenter};

/// Task store as assembled by the CLI: backends picked at runtime.
pub type Store = TaskStore<Box<dyn DurableStore>, Box<dyn RemoteSync>, ConsolePresenter>;

/// Connectivity monitor as assembled by the CLI.
pub type Monitor = ConnectivityMonitor<Box<dyn Prober>>;

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Env {
    /// Loaded configuration.
    pub config: Config,
    /// Data directory (storage location default).
    pub data_dir: PathBuf,
    /// Never probe; stay offline.
    pub offline: bool,
}

/// Open storage and the remote, and load the task store.
pub async fn open_store(env: &Env, presenter: ConsolePresenter) -> Result<Arc<Store>> {
    let storage = storage::open(&env.config.storage, &env.data_dir)
        .await
        .context("Failed to open task storage")?;
    let remote = remote::from_config(&env.config.remote).context("Failed to configure remote")?;
    Ok(Arc::new(TaskStore::load(storage, remote, presenter).await))
}

/// Build the connectivity monitor.
///
/// Without a probe URL the remote is assumed reachable.
pub fn build_monitor(env: &Env) -> Result<Monitor> {
    let probe = ProbeConfig::from(&env.config.connectivity);
    let prober: Box<dyn Prober> = match &env.config.connectivity.probe_url {
        Some(url) => Box::new(
            HttpProber::new(url, probe.timeout).context("Failed to create reachability probe")?,
        ),
        None => Box::new(AlwaysReachable),
    };
    Ok(ConnectivityMonitor::new(prober, probe))
}

/// One probe, reported to the store, unless running with `--offline`.
///
/// Going online starts a drain in the background; callers flush before
/// exiting.
pub async fn connect_once(env: &Env, store: &Arc<Store>) -> Result<bool> {
    if env.offline {
        return Ok(false);
    }
    let monitor = build_monitor(env)?;
    let online = monitor.probe().await;
    if !online {
        tracing::warn!("Remote unreachable, working offline");
    }
    store.set_online(online).await;
    Ok(online)
}

/// Wait for background work, then print the current list.
pub async fn finish(store: &Store) {
    store.flush().await;
    print!("{}", format_view(&store.view().await));
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tasks_client::{RemoteBackend, StorageBackend};

    /// Offline env storing into `dir` with a zero-latency simulated remote.
    pub fn env(dir: &std::path::Path, offline: bool) -> Env {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::File;
        config.remote.backend = RemoteBackend::Simulated;
        config.remote.min_latency_ms = 0;
        config.remote.max_latency_ms = 0;
        Env {
            config,
            data_dir: dir.to_path_buf(),
            offline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn offline_env_never_connects() {
        let dir = tempdir().unwrap();
        let env = testing::env(dir.path(), true);
        let store = open_store(&env, ConsolePresenter::quiet()).await.unwrap();

        assert!(!connect_once(&env, &store).await.unwrap());
        assert!(!store.is_online().await);
    }

    #[tokio::test]
    async fn no_probe_url_means_reachable() {
        let dir = tempdir().unwrap();
        let env = testing::env(dir.path(), false);
        let store = open_store(&env, ConsolePresenter::quiet()).await.unwrap();

        assert!(connect_once(&env, &store).await.unwrap());
        assert!(store.is_online().await);
    }

    #[tokio::test]
    async fn unreachable_probe_url_stays_offline() {
        let dir = tempdir().unwrap();
        let mut env = testing::env(dir.path(), false);
        env.config.connectivity.probe_url = Some("http://127.0.0.1:9/ping".into());
        env.config.connectivity.probe_timeout_ms = 500;
        let store = open_store(&env, ConsolePresenter::quiet()).await.unwrap();

        assert!(!connect_once(&env, &store).await.unwrap());
        assert!(!store.is_online().await);
    }
}
