//! DispatcherBuilder - dispatcher の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: 設定が不正なら worker を 1 本も起動せずにエラー
//! - ports（TaskHandler, Clock, IdGenerator）の差し替え

use std::sync::Arc;

use tracing::info;

use super::{Dispatcher, PoolConfig, RestartPolicy, WorkDelay, WorkerPool};
use crate::domain::DispatchError;
use crate::impls::{ArithmeticHandler, SimulatedWork};
use crate::ports::{Clock, IdGenerator, SystemClock, TaskHandler, UlidGenerator};
use crate::queue::{BoundedQueue, ResultInbox};

/// DispatcherBuilder は Dispatcher を構築
///
/// # 使用例
/// ```ignore
/// let dispatcher = Dispatcher::builder()
///     .workers(4)
///     .queue_capacity(64)
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    config: PoolConfig,
    handler: Option<Arc<dyn TaskHandler>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::from_config(PoolConfig::default())
    }

    pub fn from_config(config: PoolConfig) -> Self {
        Self {
            config,
            handler: None,
            clock: None,
            ids: None,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Bound the queue; `submit` blocks once `capacity` tasks are waiting.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.config.queue_capacity = None;
        self
    }

    pub fn restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.config.restart_policy = policy;
        self
    }

    pub fn simulated_work(mut self, delay: WorkDelay) -> Self {
        self.config.simulated_work = Some(delay);
        self
    }

    /// Replace the default `ArithmeticHandler`.
    pub fn handler(mut self, handler: impl TaskHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Validate the config, spawn the workers, and hand back a running dispatcher.
    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));
        let mut handler = self.handler.unwrap_or_else(|| Arc::new(ArithmeticHandler));
        if let Some(delay) = self.config.simulated_work {
            handler = Arc::new(SimulatedWork::new(handler, delay));
        }

        let queue = Arc::new(BoundedQueue::new(self.config.queue_capacity));
        let inbox = Arc::new(ResultInbox::new());
        let pool = WorkerPool::spawn(
            self.config.workers,
            Arc::clone(&queue),
            Arc::clone(&inbox),
            handler,
            Arc::clone(&clock),
            self.config.restart_policy,
        )?;

        info!(
            workers = self.config.workers,
            queue_capacity = ?self.config.queue_capacity,
            simulated_work = self.config.simulated_work.is_some(),
            "dispatcher started"
        );
        Ok(Dispatcher::from_parts(
            self.config,
            queue,
            inbox,
            ids,
            clock,
            pool,
        ))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
