//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ArithmeticHandler**: デフォルトの TaskHandler
//! - **SimulatedWork**: 処理時間をばらつかせる TaskHandler ラッパー
//! - **AsyncDispatcher**: blocking な Dispatcher を async の DispatchPort として公開

pub mod arithmetic;
pub mod async_dispatch;
pub mod simulated;

pub use self::arithmetic::ArithmeticHandler;
pub use self::async_dispatch::AsyncDispatcher;
pub use self::simulated::SimulatedWork;
