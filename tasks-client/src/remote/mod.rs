//! Remote sync abstraction for offline-tasks.
//!
//! A remote applies one mutation at a time and reports accept or fail. The
//! task store never distinguishes "already applied" from "newly applied",
//! so implementations must be safe to call twice with the same mutation.
//!
//! # Backends
//!
//! - [`MockRemote`] - records calls, scripted failures (tests)
//! - [`SimulatedRemote`] - random latency and failure rate (demo host)
//! - [`HttpRemote`] - REST calls via reqwest

mod http;
mod mock;
mod simulated;

pub use http::HttpRemote;
pub use mock::{MockRemote, RemoteCall};
pub use simulated::SimulatedRemote;

use crate::config::{RemoteBackend, RemoteConfig};
use crate::error::RemoteError;
use async_trait::async_trait;
use tasks_types::{MutationAction, MutationData};

/// Trait for applying a single mutation to the remote system.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// Apply `action` with `data`.
    ///
    /// Failures (network, timeout, rejection) come back as `Err`; this must
    /// never panic.
    async fn apply(&self, action: MutationAction, data: &MutationData) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: RemoteSync + ?Sized> RemoteSync for Box<T> {
    async fn apply(&self, action: MutationAction, data: &MutationData) -> Result<(), RemoteError> {
        (**self).apply(action, data).await
    }
}

/// Build the remote selected in `config`.
pub fn from_config(config: &RemoteConfig) -> Result<Box<dyn RemoteSync>, RemoteError> {
    match config.backend {
        RemoteBackend::Simulated => Ok(Box::new(SimulatedRemote::from_config(config))),
        RemoteBackend::Http => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| RemoteError::Request("remote.base_url is not set".into()))?;
            Ok(Box::new(HttpRemote::new(
                base_url,
                std::time::Duration::from_millis(config.timeout_ms),
            )?))
        }
    }
}
