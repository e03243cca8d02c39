//! App - アプリケーション層
//!
//! queue / inbox / ports を組み合わせて dispatcher と worker pool を実装します。
//!
//! # 主要コンポーネント
//! - **DispatcherBuilder**: 設定の検証とワイヤリング
//! - **Dispatcher**: submit / collect の入口
//! - **WorkerPool**: タスク実行ループ（get→handle→publish）
//! - **PoolConfig**: ワーカー数、queue 容量、crash 時の方針
//! - **PoolStatus**: 観測用スナップショット

pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod status;
pub mod worker;

pub use self::builder::DispatcherBuilder;
pub use self::config::{PoolConfig, RestartPolicy, WorkDelay};
pub use self::dispatcher::{Dispatcher, Results};
pub use self::status::PoolStatus;
pub use self::worker::WorkerPool;
