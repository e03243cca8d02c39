//! TaskHandler port - worker が task を計算する部分の抽象化
//!
//! worker loop は handler を呼んで Outcome にするだけで、計算の中身は知りません。
//! handler が panic しても worker loop 側で捕まえて `WorkerCrashed` にします。

use crate::domain::{FailureReason, Task};

/// Computes the value of one task.
///
/// Called concurrently from every worker thread, so implementations must be
/// `Send + Sync` and must not rely on per-call mutable state.
pub trait TaskHandler: Send + Sync {
    fn handle(&self, task: &Task) -> Result<i64, FailureReason>;
}

impl<H: TaskHandler + ?Sized> TaskHandler for std::sync::Arc<H> {
    fn handle(&self, task: &Task) -> Result<i64, FailureReason> {
        (**self).handle(task)
    }
}
