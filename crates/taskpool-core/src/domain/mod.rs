//! Domain model (ids, tasks, operations, outcomes, errors).
//!
//! Everything here is immutable once created and carries no synchronization;
//! the queue and the result inbox are the only shared mutable structures.

pub mod errors;
pub mod ids;
pub mod operation;
pub mod outcome;
pub mod task;

pub use errors::DispatchError;
pub use ids::{Id, IdMarker, TaskId, WorkerId};
pub use operation::Operation;
pub use outcome::{FailureReason, Outcome, TaskResult};
pub use task::Task;
