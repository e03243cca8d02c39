//! Errors - dispatcher のライフサイクルエラー
//!
//! 計算エラーは `Outcome::Failure` としてデータで返すので、ここには含めません。
//! ここにあるのは「submit できない」「待っても来ない」などの呼び出し側エラーだけです。

use std::time::Duration;

use thiserror::Error;

use super::TaskId;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher has been shut down (or every worker retired).
    #[error("dispatcher unavailable: no longer accepting tasks")]
    Unavailable,

    /// `try_submit` found the queue at capacity.
    #[error("task queue is full")]
    QueueFull,

    #[error("no result within {0:?}")]
    Timeout(Duration),

    /// The id is neither outstanding nor waiting to be collected.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("invalid pool config: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A blocking call bridged onto the async runtime did not complete.
    #[error("blocking bridge failed: {0}")]
    Bridge(String),
}
