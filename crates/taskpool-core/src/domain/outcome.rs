//! Outcome model: what a worker reports back for one task.
//!
//! Computation errors travel as data (`Outcome::Failure`), never as a panic or
//! an `Err` across the queue boundary. The caller decides what a failure means.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{TaskId, WorkerId};

/// Why a task did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("arithmetic overflow")]
    Overflow,

    /// The handler panicked while this task was in flight.
    #[error("worker crashed: {0}")]
    WorkerCrashed(String),

    /// Every worker retired before this task could be picked up.
    #[error("no workers left to run the task")]
    NoWorkers,
}

/// `Success(value) | Failure(reason)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success(i64),
    Failure(FailureReason),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Outcome::Success(v) => Some(*v),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(reason) => Some(reason),
        }
    }
}

impl From<Result<i64, FailureReason>> for Outcome {
    fn from(result: Result<i64, FailureReason>) -> Self {
        match result {
            Ok(v) => Outcome::Success(v),
            Err(reason) => Outcome::Failure(reason),
        }
    }
}

/// The immutable result of processing one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    task_id: TaskId,
    worker_id: WorkerId,
    outcome: Outcome,
    completed_at: DateTime<Utc>,
}

impl TaskResult {
    pub fn new(
        task_id: TaskId,
        worker_id: WorkerId,
        outcome: Outcome,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            worker_id,
            outcome,
            completed_at,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn value(&self) -> Option<i64> {
        self.outcome.value()
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    #[test]
    fn outcome_serializes_as_tagged_variant() {
        let ok = serde_json::to_value(Outcome::Success(15)).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "SUCCESS", "value": 15}));

        let err = serde_json::to_value(Outcome::Failure(FailureReason::UnknownOperation(
            "divide".to_string(),
        )))
        .unwrap();
        assert_eq!(err["status"], "FAILURE");
        assert_eq!(err["value"]["kind"], "UNKNOWN_OPERATION");
        assert_eq!(err["value"]["detail"], "divide");
    }

    #[test]
    fn outcome_from_result() {
        let ok: Outcome = Ok(56).into();
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(56));

        let err: Outcome = Err(FailureReason::Overflow).into();
        assert!(!err.is_success());
        assert_eq!(err.failure(), Some(&FailureReason::Overflow));
    }

    #[test]
    fn failure_reason_messages() {
        assert_eq!(
            FailureReason::WorkerCrashed("boom".to_string()).to_string(),
            "worker crashed: boom"
        );
        assert_eq!(FailureReason::NoWorkers.to_string(), "no workers left to run the task");
    }

    #[test]
    fn task_result_roundtrip_json() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let result = TaskResult::new(
            TaskId::from_ulid(Ulid::new()),
            WorkerId::new(1),
            Outcome::Success(6),
            at,
        );

        let s = serde_json::to_string(&result).unwrap();
        let back: TaskResult = serde_json::from_str(&s).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.worker_id().index(), 1);
    }
}
