//! WorkerPool - 固定数のワーカースレッド
//!
//! # フロー（1 ワーカー）
//! 1. `queue.get()` で task を取る（空なら待つ、close 済みで空なら終了）
//! 2. handler（と完了時刻の取得）を `catch_unwind` の中で実行
//! 3. 結果を 1 件だけ inbox に publish（panic した場合も `WorkerCrashed` として publish）
//! 4. panic した場合は RestartPolicy に従って再起動 or 退役
//!
//! # 停止
//! - `request_shutdown()`: queue を close するだけ（残りの task は処理される）
//! - `shutdown_and_join()`: close してから全ワーカーを join（barrier）

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::RestartPolicy;
use crate::domain::{DispatchError, FailureReason, Outcome, Task, TaskResult, WorkerId};
use crate::ports::{Clock, TaskHandler};
use crate::queue::{BoundedQueue, ResultInbox};

/// State every worker thread shares with the pool handle.
struct Shared {
    queue: Arc<BoundedQueue<Task>>,
    inbox: Arc<ResultInbox>,
    handler: Arc<dyn TaskHandler>,
    clock: Arc<dyn Clock>,
    policy: RestartPolicy,
    live: AtomicUsize,
    restarts: AtomicU64,
}

/// Worker pool handle.
/// - Worker count is fixed at `spawn`.
/// - Dropping the pool closes the queue and joins every worker.
pub struct WorkerPool {
    shared: Arc<Shared>,
    joins: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl WorkerPool {
    /// Spawn `size` named worker threads pulling from `queue`.
    ///
    /// If a thread fails to spawn, the ones already started are shut down and
    /// the error is returned.
    pub fn spawn(
        size: usize,
        queue: Arc<BoundedQueue<Task>>,
        inbox: Arc<ResultInbox>,
        handler: Arc<dyn TaskHandler>,
        clock: Arc<dyn Clock>,
        policy: RestartPolicy,
    ) -> Result<Self, DispatchError> {
        if size == 0 {
            return Err(DispatchError::InvalidConfig(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            queue,
            inbox,
            handler,
            clock,
            policy,
            live: AtomicUsize::new(0),
            restarts: AtomicU64::new(0),
        });

        let pool = Self {
            shared: Arc::clone(&shared),
            joins: Mutex::new(Vec::with_capacity(size)),
            size,
        };

        for index in 0..size {
            let worker_id = WorkerId::new(index);

            // live は spawn 前に数える（ワーカーが即終了しても負にならないように）
            shared.live.fetch_add(1, Ordering::SeqCst);
            let spawned = thread::Builder::new()
                .name(format!("taskpool-worker-{index}"))
                .spawn({
                    let shared = Arc::clone(&shared);
                    move || worker_loop(worker_id, shared)
                });

            match spawned {
                Ok(join) => pool.lock_joins().push(join),
                Err(e) => {
                    shared.live.fetch_sub(1, Ordering::SeqCst);
                    error!(%worker_id, error = %e, "failed to spawn worker thread");
                    pool.shutdown_and_join();
                    return Err(DispatchError::Spawn(e));
                }
            }
        }

        info!(workers = size, policy = ?policy, "worker pool started");
        Ok(pool)
    }

    fn lock_joins(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.joins.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn live_workers(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    pub fn restarts(&self) -> u64 {
        self.shared.restarts.load(Ordering::SeqCst)
    }

    /// Stop taking new tasks. Workers finish what is queued, then exit.
    pub fn request_shutdown(&self) {
        self.shared.queue.close();
    }

    /// Close the queue and wait for every worker to exit. Idempotent.
    pub fn shutdown_and_join(&self) {
        self.request_shutdown();
        let joins: Vec<JoinHandle<()>> = self.lock_joins().drain(..).collect();
        if joins.is_empty() {
            return;
        }
        for join in joins {
            if join.join().is_err() {
                // handler の panic は worker_loop 内で捕まえているので、ここに来るのは想定外
                warn!("worker thread panicked outside task execution");
            }
        }
        info!(restarts = self.restarts(), "worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn worker_loop(worker_id: WorkerId, shared: Arc<Shared>) {
    info!(%worker_id, "worker started");

    while let Some(task) = shared.queue.get() {
        let task_id = task.id();
        debug!(%worker_id, %task_id, operation = %task.operation(), "processing task");

        // clock の panic も handler と同じく task の crash として扱う
        let processed = panic::catch_unwind(AssertUnwindSafe(|| {
            let outcome = Outcome::from(shared.handler.handle(&task));
            debug!(%worker_id, %task_id, ?outcome, "task finished");
            TaskResult::new(task_id, worker_id, outcome, shared.clock.now())
        }));
        let (result, message) = match processed {
            Ok(result) => {
                shared.inbox.publish(result);
                continue;
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let result = TaskResult::new(
                    task_id,
                    worker_id,
                    Outcome::Failure(FailureReason::WorkerCrashed(message.clone())),
                    completed_at(shared.clock.as_ref()),
                );
                (result, message)
            }
        };

        // counters move before publish so a caller holding the crash result sees them
        match shared.policy {
            RestartPolicy::Restart => {
                let restarts = shared.restarts.fetch_add(1, Ordering::SeqCst) + 1;
                warn!(%worker_id, %task_id, panic = %message, restarts, "worker crashed; restarting");
                shared.inbox.publish(result);
            }
            RestartPolicy::Retire => {
                warn!(%worker_id, %task_id, panic = %message, "worker crashed; retiring");
                retire(worker_id, &shared, result);
                return;
            }
        }
    }

    shared.live.fetch_sub(1, Ordering::SeqCst);
    info!(%worker_id, "worker shutting down");
}

/// Remove a crashed worker. The last one out fails whatever is still queued.
fn retire(worker_id: WorkerId, shared: &Shared, crashed: TaskResult) {
    let remaining = shared.live.fetch_sub(1, Ordering::SeqCst) - 1;
    if remaining > 0 {
        shared.inbox.publish(crashed);
        return;
    }

    // crash の結果を見た呼び出し側が submit しても Unavailable になるよう、publish より先に close
    shared.queue.close();
    shared.inbox.publish(crashed);
    let stranded = shared.queue.drain();
    error!(
        %worker_id,
        stranded = stranded.len(),
        "every worker has retired; failing queued tasks"
    );
    for task in stranded {
        shared.inbox.publish(TaskResult::new(
            task.id(),
            worker_id,
            Outcome::Failure(FailureReason::NoWorkers),
            completed_at(shared.clock.as_ref()),
        ));
    }
}

/// Timestamp for a failure report; falls back to `Utc::now()` if the clock itself panics.
fn completed_at(clock: &dyn Clock) -> DateTime<Utc> {
    panic::catch_unwind(AssertUnwindSafe(|| clock.now())).unwrap_or_else(|_| Utc::now())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
