//! ArithmeticHandler - デフォルトの TaskHandler
//!
//! add / multiply / subtract をそのまま計算します。未知の operation や overflow は
//! `FailureReason` として返し、panic はしません。

use crate::domain::{FailureReason, Task};
use crate::ports::TaskHandler;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticHandler;

impl ArithmeticHandler {
    pub fn new() -> Self {
        Self
    }
}

impl TaskHandler for ArithmeticHandler {
    fn handle(&self, task: &Task) -> Result<i64, FailureReason> {
        let (a, b) = task.operands();
        task.operation().apply(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Operation, TaskId};
    use chrono::Utc;
    use ulid::Ulid;

    fn task(op: &str, a: i64, b: i64) -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::new()),
            Operation::parse(op),
            a,
            b,
            Utc::now(),
        )
    }

    #[test]
    fn computes_known_operations() {
        let handler = ArithmeticHandler::new();
        assert_eq!(handler.handle(&task("add", 10, 5)), Ok(15));
        assert_eq!(handler.handle(&task("multiply", 7, 8)), Ok(56));
        assert_eq!(handler.handle(&task("subtract", 9, 3)), Ok(6));
    }

    #[test]
    fn same_task_same_value() {
        let handler = ArithmeticHandler::new();
        let t = task("multiply", 12, 12);
        assert_eq!(handler.handle(&t), handler.handle(&t));
    }

    #[test]
    fn unknown_operation_fails() {
        let handler = ArithmeticHandler::new();
        assert_eq!(
            handler.handle(&task("divide", 5, 0)),
            Err(FailureReason::UnknownOperation("divide".to_string()))
        );
    }
}
