use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Operation, TaskId};

/// An immutable unit of work: operation + operands + id.
///
/// Created by the dispatcher on submit, consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    operation: Operation,
    operand_a: i64,
    operand_b: i64,
    submitted_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: TaskId,
        operation: Operation,
        operand_a: i64,
        operand_b: i64,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            operation,
            operand_a,
            operand_b,
            submitted_at,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn operands(&self) -> (i64, i64) {
        (self.operand_a, self.operand_b)
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
