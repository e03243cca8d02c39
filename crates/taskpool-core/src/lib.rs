//! taskpool-core
//!
//! Dispatcher / worker-pool building blocks: a blocking FIFO task queue, a
//! fixed pool of worker threads, and a dispatcher that accepts tasks and hands
//! back results in completion order.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, operation, task, outcome, errors）
//! - **ports**: 抽象化レイヤー（TaskHandler, Clock, IdGenerator, DispatchPort）
//! - **queue**: BoundedQueue（task 用）と ResultInbox（結果用）
//! - **app**: DispatcherBuilder, Dispatcher, WorkerPool, PoolConfig, PoolStatus
//! - **impls**: ports の実装（ArithmeticHandler, SimulatedWork, AsyncDispatcher）
//!
//! # 使用例
//! ```ignore
//! let dispatcher = Dispatcher::builder().workers(2).build()?;
//! let id = dispatcher.submit("add", 10, 5)?;
//! for result in dispatcher.results() {
//!     println!("{} = {:?} ({})", result.task_id(), result.outcome(), result.worker_id());
//! }
//! dispatcher.shutdown();
//! ```

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{Dispatcher, DispatcherBuilder, PoolConfig, PoolStatus, RestartPolicy, WorkDelay};
pub use domain::{DispatchError, FailureReason, Operation, Outcome, Task, TaskId, TaskResult, WorkerId};
pub use impls::AsyncDispatcher;
pub use ports::DispatchPort;
