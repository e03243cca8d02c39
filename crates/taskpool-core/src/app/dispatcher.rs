//! Dispatcher - submit と collect の唯一の入口
//!
//! submit 側と collect 側を分けているので、呼び出し側は結果を待たずに
//! 何件でも投げられます。完了順は submit 順と一致するとは限りません。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{DispatcherBuilder, PoolConfig, PoolStatus, WorkerPool};
use crate::domain::{DispatchError, Operation, Task, TaskId, TaskResult};
use crate::ports::{Clock, IdGenerator};
use crate::queue::{BoundedQueue, Collected, QueueError, ResultInbox};

pub struct Dispatcher {
    config: PoolConfig,
    queue: Arc<BoundedQueue<Task>>,
    inbox: Arc<ResultInbox>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    pool: WorkerPool,
}

impl Dispatcher {
    /// Start a dispatcher with the default handler, clock and id generator.
    pub fn new(config: PoolConfig) -> Result<Self, DispatchError> {
        DispatcherBuilder::from_config(config).build()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(crate) fn from_parts(
        config: PoolConfig,
        queue: Arc<BoundedQueue<Task>>,
        inbox: Arc<ResultInbox>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            config,
            queue,
            inbox,
            ids,
            clock,
            pool,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Submit a task. Blocks only while a bounded queue is full.
    ///
    /// Fails with `Unavailable` after shutdown.
    ///
    /// Every result is kept until it is collected. Fire-and-forget callers
    /// that never collect should call [`Dispatcher::discard_ready`] from time
    /// to time, or the inbox keeps growing for the life of the dispatcher.
    pub fn submit(
        &self,
        operation: impl Into<Operation>,
        a: i64,
        b: i64,
    ) -> Result<TaskId, DispatchError> {
        let task = self.make_task(operation.into(), a, b);
        self.enqueue(task, |queue, task| queue.put(task))
    }

    /// Submit without blocking; `QueueFull` if the queue is at capacity.
    pub fn try_submit(
        &self,
        operation: impl Into<Operation>,
        a: i64,
        b: i64,
    ) -> Result<TaskId, DispatchError> {
        let task = self.make_task(operation.into(), a, b);
        self.enqueue(task, |queue, task| queue.try_put(task))
    }

    fn make_task(&self, operation: Operation, a: i64, b: i64) -> Task {
        Task::new(
            self.ids.generate_task_id(),
            operation,
            a,
            b,
            self.clock.now(),
        )
    }

    fn enqueue(
        &self,
        task: Task,
        put: impl FnOnce(&BoundedQueue<Task>, Task) -> Result<(), QueueError<Task>>,
    ) -> Result<TaskId, DispatchError> {
        let task_id = task.id();
        let operation = task.operation().clone();

        // 先に outstanding に入れておく（put 直後に worker が publish しても取りこぼさない）
        self.inbox.reserve(task_id);
        match put(&self.queue, task) {
            Ok(()) => {
                debug!(%task_id, %operation, "task submitted");
                Ok(task_id)
            }
            Err(err) => {
                self.inbox.cancel(task_id);
                Err(match err {
                    QueueError::Closed(_) => DispatchError::Unavailable,
                    QueueError::Full(_) => DispatchError::QueueFull,
                })
            }
        }
    }

    /// Next result in completion order; `None` when nothing is pending.
    pub fn collect(&self) -> Option<TaskResult> {
        match self.inbox.collect() {
            Collected::Ready(result) => Some(result),
            Collected::NothingPending | Collected::TimedOut => None,
        }
    }

    /// Like `collect`, but gives up with `Timeout` after `timeout`.
    pub fn collect_timeout(&self, timeout: Duration) -> Result<Option<TaskResult>, DispatchError> {
        match self.inbox.collect_timeout(timeout) {
            Collected::Ready(result) => Ok(Some(result)),
            Collected::NothingPending => Ok(None),
            Collected::TimedOut => Err(DispatchError::Timeout(timeout)),
        }
    }

    /// A result that is already available, without waiting.
    pub fn try_collect(&self) -> Option<TaskResult> {
        self.inbox.try_collect()
    }

    /// Wait for the result of `task_id` (request/response style).
    ///
    /// Other results stay in the inbox for `collect`.
    pub fn wait_for(&self, task_id: TaskId, timeout: Duration) -> Result<TaskResult, DispatchError> {
        match self.inbox.wait_for(task_id, timeout) {
            Some(Collected::Ready(result)) => Ok(result),
            Some(Collected::TimedOut) => Err(DispatchError::Timeout(timeout)),
            Some(Collected::NothingPending) | None => Err(DispatchError::UnknownTask(task_id)),
        }
    }

    /// Drop results that are ready but were never collected.
    ///
    /// Tasks still running are unaffected; their results arrive as usual.
    pub fn discard_ready(&self) -> usize {
        let dropped = self.inbox.discard_ready();
        if dropped > 0 {
            debug!(dropped, "discarded uncollected results");
        }
        dropped
    }

    /// Lazily collect results until nothing is pending.
    pub fn results(&self) -> Results<'_> {
        Results { dispatcher: self }
    }

    pub fn is_accepting(&self) -> bool {
        !self.queue.is_closed()
    }

    pub fn status(&self) -> PoolStatus {
        let tally = self.inbox.tally();
        PoolStatus {
            workers: self.pool.size(),
            live_workers: self.pool.live_workers(),
            restarts: self.pool.restarts(),
            queued: self.queue.len(),
            outstanding: self.inbox.outstanding(),
            ready: self.inbox.ready(),
            succeeded: tally.succeeded,
            failed: tally.failed,
            crashed: tally.crashed,
            accepting: self.is_accepting(),
        }
    }

    /// Graceful shutdown: stop accepting, let workers drain the queue, join them.
    ///
    /// Results produced before or during shutdown stay collectible. Idempotent.
    pub fn shutdown(&self) -> PoolStatus {
        info!(queued = self.queue.len(), "dispatcher shutting down");
        self.pool.shutdown_and_join();
        let status = self.status();
        info!(
            succeeded = status.succeeded,
            failed = status.failed,
            ready = status.ready,
            "dispatcher stopped"
        );
        status
    }
}

/// Iterator returned by [`Dispatcher::results`].
pub struct Results<'a> {
    dispatcher: &'a Dispatcher,
}

impl Iterator for Results<'_> {
    type Item = TaskResult;

    fn next(&mut self) -> Option<TaskResult> {
        self.dispatcher.collect()
    }
}
