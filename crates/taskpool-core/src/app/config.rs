//! PoolConfig - worker pool の設定
//!
//! serde の `Deserialize` を実装しているので、外側のツールが JSON などから
//! 読み込めます。足りないフィールドは `Default` の値になります。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DispatchError;

/// What happens to a worker whose handler panicked.
///
/// The in-flight task is reported as `WorkerCrashed` in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Restart the worker in the same slot; capacity is unchanged.
    #[default]
    Restart,
    /// Let the worker exit; the pool runs with reduced capacity.
    Retire,
}

/// Uniform random delay applied before each task is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl WorkDelay {
    /// 100–500 ms, the spread used by the classroom demo.
    pub fn demo() -> Self {
        Self {
            min_ms: 100,
            max_ms: 500,
        }
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads. Fixed for the lifetime of the pool.
    pub workers: usize,

    /// `None` = unbounded queue; `Some(n)` = `submit` blocks once `n` tasks are waiting.
    pub queue_capacity: Option<usize>,

    pub restart_policy: RestartPolicy,

    pub simulated_work: Option<WorkDelay>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            queue_capacity: None,
            restart_policy: RestartPolicy::default(),
            simulated_work: None,
        }
    }
}

impl PoolConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.workers == 0 {
            return Err(DispatchError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(DispatchError::InvalidConfig(
                "queue_capacity must be at least 1 (use null for unbounded)".to_string(),
            ));
        }
        if let Some(delay) = self.simulated_work
            && delay.min_ms > delay.max_ms
        {
            return Err(DispatchError::InvalidConfig(format!(
                "simulated_work.min_ms ({}) exceeds max_ms ({})",
                delay.min_ms, delay.max_ms
            )));
        }
        Ok(())
    }
}
