//! Status - pool のスナップショット
//!
//! 各値は別々のロックから読むので、厳密に同時刻の値ではありません（観測用）。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Worker slots the pool was created with.
    pub workers: usize,
    /// Workers still running (drops below `workers` only under `RestartPolicy::Retire`).
    pub live_workers: usize,
    pub restarts: u64,

    /// Tasks waiting in the queue.
    pub queued: usize,
    /// Submitted tasks whose result has not been published yet.
    pub outstanding: usize,
    /// Published results not yet collected.
    pub ready: usize,

    pub succeeded: u64,
    pub failed: u64,
    pub crashed: u64,

    /// Whether `submit` is still accepted.
    pub accepting: bool,
}

impl PoolStatus {
    /// Not accepting, nothing queued or in flight, and every worker has exited.
    pub fn is_terminated(&self) -> bool {
        !self.accepting && self.live_workers == 0 && self.queued == 0 && self.outstanding == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_not_accepting_and_terminated() {
        let status = PoolStatus::default();
        assert!(status.is_terminated());
    }

    #[test]
    fn running_pool_is_not_terminated() {
        let status = PoolStatus {
            workers: 2,
            live_workers: 2,
            accepting: true,
            ..PoolStatus::default()
        };
        assert!(!status.is_terminated());

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["live_workers"], 2);
    }
}
