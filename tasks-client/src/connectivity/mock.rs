//! Scriptable prober.
//!
//! Used by tests, and by hosts that have no probe URL configured (where it
//! simply reports a fixed reachability).

use super::Prober;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Prober with scripted results.
///
/// Scripted results are consumed first, then the default applies. Clones
/// share state.
#[derive(Debug, Default)]
pub struct MockProber {
    inner: Arc<Mutex<MockProberInner>>,
}

#[derive(Debug, Default)]
struct MockProberInner {
    reachable: bool,
    script: VecDeque<bool>,
    calls: usize,
    latency: Duration,
}

impl MockProber {
    /// Create a prober whose default answer is `reachable`.
    pub fn new(reachable: bool) -> Self {
        let prober = Self::default();
        prober.set_reachable(reachable);
        prober
    }

    /// Change the default answer.
    pub fn set_reachable(&self, reachable: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.reachable = reachable;
    }

    /// Queue answers for the next probes.
    pub fn script(&self, results: impl IntoIterator<Item = bool>) {
        let mut inner = self.inner.lock().unwrap();
        inner.script.extend(results);
    }

    /// Delay every probe by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = latency;
    }

    /// Number of probes run so far.
    pub fn call_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.calls
    }
}

impl Clone for MockProber {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self) -> bool {
        let (result, latency) = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls += 1;
            let result = inner.script.pop_front().unwrap_or(inner.reachable);
            (result, inner.latency)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_then_default() {
        let prober = MockProber::new(true);
        prober.script([false, false]);

        assert!(!prober.probe().await);
        assert!(!prober.probe().await);
        assert!(prober.probe().await);
        assert_eq!(prober.call_count(), 3);
    }
}
