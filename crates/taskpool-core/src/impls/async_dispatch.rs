//! AsyncDispatcher - blocking な Dispatcher を async から使うためのアダプタ
//!
//! # 学習ポイント
//! - Async での blocking 処理の扱い（spawn_blocking）
//! - Condvar で待つ処理を tokio の worker thread 上で直接呼ばない

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{Dispatcher, PoolStatus};
use crate::domain::{DispatchError, Operation, TaskId, TaskResult};
use crate::ports::DispatchPort;

/// Async handle over a shared [`Dispatcher`].
///
/// Dropping the last clone drops the dispatcher, which joins the worker
/// threads on the current thread. Inside a runtime, call
/// [`DispatchPort::shutdown`] first: it drains and joins on the blocking
/// pool, and the later drop has nothing left to wait for.
#[derive(Clone)]
pub struct AsyncDispatcher {
    inner: Arc<Dispatcher>,
}

impl AsyncDispatcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_arc(Arc::new(dispatcher))
    }

    pub fn from_arc(inner: Arc<Dispatcher>) -> Self {
        Self { inner }
    }

    /// The blocking dispatcher underneath (for sync callers sharing the pool).
    pub fn blocking(&self) -> &Arc<Dispatcher> {
        &self.inner
    }

    async fn run_blocking<F, R>(&self, f: F) -> Result<R, DispatchError>
    where
        F: FnOnce(&Dispatcher) -> R + Send + 'static,
        R: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&inner))
            .await
            .map_err(|e| DispatchError::Bridge(e.to_string()))
    }
}

#[async_trait]
impl DispatchPort for AsyncDispatcher {
    async fn submit(&self, operation: Operation, a: i64, b: i64) -> Result<TaskId, DispatchError> {
        // bounded queue だと put が待つので blocking 扱い
        self.run_blocking(move |d| d.submit(operation, a, b)).await?
    }

    async fn collect(&self, timeout: Duration) -> Result<Option<TaskResult>, DispatchError> {
        self.run_blocking(move |d| d.collect_timeout(timeout)).await?
    }

    async fn wait_for(
        &self,
        task_id: TaskId,
        timeout: Duration,
    ) -> Result<TaskResult, DispatchError> {
        self.run_blocking(move |d| d.wait_for(task_id, timeout)).await?
    }

    async fn status(&self) -> PoolStatus {
        self.inner.status()
    }

    async fn shutdown(&self) -> Result<PoolStatus, DispatchError> {
        self.run_blocking(|d| d.shutdown()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::WorkDelay;
    use crate::domain::{FailureReason, Outcome};

    fn async_dispatcher(workers: usize) -> AsyncDispatcher {
        AsyncDispatcher::new(Dispatcher::builder().workers(workers).build().unwrap())
    }

    #[tokio::test]
    async fn request_response_roundtrip() {
        let port = async_dispatcher(2);

        let id = port.submit(Operation::Multiply, 7, 8).await.unwrap();
        let result = port.wait_for(id, Duration::from_secs(5)).await.unwrap();

        assert_eq!(result.task_id(), id);
        assert_eq!(result.value(), Some(56));
    }

    #[tokio::test]
    async fn fire_and_forget_then_collect() {
        let port = async_dispatcher(3);
        let mut submitted = Vec::new();
        for (op, a, b) in [("add", 100, 200), ("add", 10, 5), ("multiply", 7, 8)] {
            submitted.push(port.submit(Operation::parse(op), a, b).await.unwrap());
        }

        let mut values = Vec::new();
        while let Some(result) = port.collect(Duration::from_secs(5)).await.unwrap() {
            assert!(submitted.contains(&result.task_id()));
            values.push(result.value().unwrap());
        }
        values.sort_unstable();
        assert_eq!(values, vec![15, 56, 300]);
    }

    #[tokio::test]
    async fn unknown_operation_comes_back_as_failure() {
        let port = async_dispatcher(1);
        let id = port
            .submit(Operation::parse("divide"), 5, 0)
            .await
            .unwrap();

        let result = port.wait_for(id, Duration::from_secs(5)).await.unwrap();
        assert!(matches!(
            result.outcome(),
            Outcome::Failure(FailureReason::UnknownOperation(op)) if op == "divide"
        ));
    }

    #[tokio::test]
    async fn collect_times_out_while_task_runs() {
        let port = AsyncDispatcher::new(
            Dispatcher::builder()
                .workers(1)
                .simulated_work(WorkDelay {
                    min_ms: 300,
                    max_ms: 300,
                })
                .build()
                .unwrap(),
        );
        port.submit(Operation::Add, 1, 1).await.unwrap();

        let err = port.collect(Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, DispatchError::Timeout(_)));
    }

    #[tokio::test]
    async fn shutdown_drains_and_rejects_new_work() {
        let port = async_dispatcher(2);
        for i in 0..10 {
            port.submit(Operation::Add, i, 1).await.unwrap();
        }

        let status = port.shutdown().await.unwrap();
        assert_eq!(status.succeeded, 10);
        assert!(!port.status().await.accepting);

        let err = port.submit(Operation::Add, 1, 1).await.unwrap_err();
        assert!(matches!(err, DispatchError::Unavailable));
        assert_eq!(port.blocking().results().count(), 10);
    }

    #[tokio::test]
    async fn drop_after_shutdown_has_no_workers_to_join() {
        let port = async_dispatcher(2);
        let id = port.submit(Operation::Add, 1, 1).await.unwrap();

        let status = port.shutdown().await.unwrap();
        assert_eq!(status.live_workers, 0);
        assert_eq!(port.blocking().wait_for(id, Duration::ZERO).unwrap().value(), Some(2));
        drop(port);
    }
}
