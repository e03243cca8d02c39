//! Ports - 抽象化レイヤー
//!
//! dispatcher / worker pool が外側に依存する部分を trait として定義します。
//! 実装は `impls` にあります。

pub mod clock;
pub mod dispatch;
pub mod handler;
pub mod id_generator;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::dispatch::DispatchPort;
pub use self::handler::TaskHandler;
pub use self::id_generator::{IdGenerator, SequentialIdGenerator, UlidGenerator};
