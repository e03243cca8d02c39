//! DispatchPort - 非同期の呼び出し側から dispatcher を使うためのポート
//!
//! HTTP ハンドラなど async な呼び出し側は、このポート越しに submit / collect します。
//! - request/response 型: `submit` → `wait_for`
//! - fire-and-forget 型: `submit` で TaskId だけ返す

use std::time::Duration;

use async_trait::async_trait;

use crate::app::PoolStatus;
use crate::domain::{DispatchError, Operation, TaskId, TaskResult};

#[async_trait]
pub trait DispatchPort: Send + Sync {
    /// Submit a task; waits only for queue backpressure.
    async fn submit(&self, operation: Operation, a: i64, b: i64) -> Result<TaskId, DispatchError>;

    /// Next result in completion order. `Ok(None)` when nothing is pending.
    async fn collect(&self, timeout: Duration) -> Result<Option<TaskResult>, DispatchError>;

    /// The result of one specific task.
    async fn wait_for(&self, task_id: TaskId, timeout: Duration)
    -> Result<TaskResult, DispatchError>;

    async fn status(&self) -> PoolStatus;

    /// Graceful shutdown: stop accepting, drain, join workers.
    async fn shutdown(&self) -> Result<PoolStatus, DispatchError>;
}
