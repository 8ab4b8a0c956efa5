//! Mock remote for testing.
//!
//! Captures every call and allows scripting failures and latency.

use super::RemoteSync;
use crate::error::RemoteError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tasks_types::{MutationAction, MutationData, TaskId};

/// A call the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    /// Action that was applied.
    pub action: MutationAction,
    /// Task the mutation targeted.
    pub task_id: TaskId,
}

/// Mock remote for testing.
///
/// Clones share state, so a test keeps a handle after handing one to the
/// task store.
#[derive(Debug, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    calls: Vec<RemoteCall>,
    fail_next: Option<String>,
    fail_on_call: Option<usize>,
    fail_all: Option<String>,
    latency: Duration,
}

impl MockRemote {
    /// Create a new mock remote that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RemoteCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.calls.len()
    }

    /// Cause the next apply() to fail with the given error.
    pub fn fail_next(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(error.to_string());
    }

    /// Cause the `n`th call (1-based, counted from creation or the last
    /// reset) to fail.
    pub fn fail_on_call(&self, n: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on_call = Some(n);
    }

    /// Cause every apply() to fail until cleared with `None`.
    pub fn fail_all(&self, error: Option<&str>) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_all = error.map(str::to_string);
    }

    /// Delay every apply() by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = latency;
    }

    /// Clear all state (calls, scripted failures, latency).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockRemoteInner::default();
    }
}

impl Clone for MockRemote {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RemoteSync for MockRemote {
    async fn apply(&self, action: MutationAction, data: &MutationData) -> Result<(), RemoteError> {
        let (result, latency) = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(RemoteCall {
                action,
                task_id: data.task_id(),
            });
            let call_number = inner.calls.len();

            let failure = if let Some(error) = inner.fail_next.take() {
                Some(error)
            } else if inner.fail_on_call == Some(call_number) {
                Some(format!("scripted failure on call {}", call_number))
            } else {
                inner.fail_all.clone()
            };

            (
                failure.map_or(Ok(()), |e| Err(RemoteError::Simulated(e))),
                inner.latency,
            )
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        result
    }
}
