//! Simulated remote: random latency, optional random failures.

use super::RemoteSync;
use crate::config::RemoteConfig;
use crate::error::RemoteError;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tasks_types::{MutationAction, MutationData};

/// Stand-in for a real task API.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    min_latency: Duration,
    max_latency: Duration,
    failure_rate: f64,
}

impl SimulatedRemote {
    /// Create a simulated remote. The range is reordered if inverted and the
    /// failure rate is clamped to [0, 1].
    pub fn new(min_latency: Duration, max_latency: Duration, failure_rate: f64) -> Self {
        let (min_latency, max_latency) = if min_latency <= max_latency {
            (min_latency, max_latency)
        } else {
            (max_latency, min_latency)
        };
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            min_latency,
            max_latency,
            failure_rate,
        }
    }

    /// Build from the `[remote]` config section.
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_latency_ms),
            Duration::from_millis(config.max_latency_ms),
            config.failure_rate,
        )
    }

    fn roll(&self) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        let latency = rng.gen_range(self.min_latency..=self.max_latency);
        let fails = rng.gen_bool(self.failure_rate);
        (latency, fails)
    }
}

#[async_trait]
impl RemoteSync for SimulatedRemote {
    async fn apply(&self, action: MutationAction, data: &MutationData) -> Result<(), RemoteError> {
        let (latency, fails) = self.roll();
        tokio::time::sleep(latency).await;

        if fails {
            tracing::debug!("Simulated {} of task {} failed", action, data.task_id());
            return Err(RemoteError::Simulated(format!("{} rejected", action)));
        }
        tracing::debug!(
            "Simulated {} of task {} after {:?}",
            action,
            data.task_id(),
            latency
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasks_types::TaskId;

    fn reference() -> MutationData {
        MutationData::Reference { id: TaskId::new(1) }
    }

    #[test]
    fn inverted_range_is_reordered() {
        let remote = SimulatedRemote::new(Duration::from_millis(50), Duration::from_millis(10), 0.0);
        assert_eq!(remote.min_latency, Duration::from_millis(10));
        assert_eq!(remote.max_latency, Duration::from_millis(50));
    }

    #[test]
    fn failure_rate_is_clamped() {
        let remote = SimulatedRemote::new(Duration::ZERO, Duration::ZERO, 7.0);
        assert_eq!(remote.failure_rate, 1.0);

        let remote = SimulatedRemote::new(Duration::ZERO, Duration::ZERO, f64::NAN);
        assert_eq!(remote.failure_rate, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_stays_in_range() {
        let remote = SimulatedRemote::new(
            Duration::from_millis(100),
            Duration::from_millis(200),
            0.0,
        );

        let start = tokio::time::Instant::now();
        remote.apply(MutationAction::Delete, &reference()).await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed <= Duration::from_millis(201));
    }

    #[tokio::test]
    async fn certain_failure_always_fails() {
        let remote = SimulatedRemote::new(Duration::ZERO, Duration::ZERO, 1.0);
        for _ in 0..5 {
            assert!(remote.apply(MutationAction::Delete, &reference()).await.is_err());
        }
    }

    #[tokio::test]
    async fn zero_failure_rate_always_succeeds() {
        let remote = SimulatedRemote::new(Duration::ZERO, Duration::ZERO, 0.0);
        for _ in 0..5 {
            assert!(remote.apply(MutationAction::Delete, &reference()).await.is_ok());
        }
    }
}
