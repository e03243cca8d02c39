//! Arithmetic operations a task can request.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::outcome::FailureReason;

/// The operation requested by a task.
///
/// Unknown names are kept as `Other` instead of being rejected at submit time:
/// the worker reports them as a failed result so the caller sees the task id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Multiply,
    Subtract,
    Other(String),
}

impl Operation {
    /// Parse an operation name (case-insensitive). Never fails.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "add" => Operation::Add,
            "multiply" | "mul" => Operation::Multiply,
            "subtract" | "sub" => Operation::Subtract,
            _ => Operation::Other(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operation::Add => "add",
            Operation::Multiply => "multiply",
            Operation::Subtract => "subtract",
            Operation::Other(name) => name,
        }
    }

    /// Apply the operation with checked arithmetic.
    pub fn apply(&self, a: i64, b: i64) -> Result<i64, FailureReason> {
        let value = match self {
            Operation::Add => a.checked_add(b),
            Operation::Multiply => a.checked_mul(b),
            Operation::Subtract => a.checked_sub(b),
            Operation::Other(name) => return Err(FailureReason::UnknownOperation(name.clone())),
        };
        value.ok_or(FailureReason::Overflow)
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Operation::parse(name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("add", Operation::Add)]
    #[case("ADD", Operation::Add)]
    #[case("mul", Operation::Multiply)]
    #[case(" multiply ", Operation::Multiply)]
    #[case("sub", Operation::Subtract)]
    #[case("divide", Operation::Other("divide".to_string()))]
    fn parse_accepts_names_and_aliases(#[case] name: &str, #[case] expected: Operation) {
        assert_eq!(Operation::parse(name), expected);
    }

    #[rstest]
    #[case(Operation::Add, 10, 5, 15)]
    #[case(Operation::Multiply, 7, 8, 56)]
    #[case(Operation::Subtract, 9, 3, 6)]
    #[case(Operation::Subtract, 3, 9, -6)]
    fn apply_computes_value(#[case] op: Operation, #[case] a: i64, #[case] b: i64, #[case] want: i64) {
        assert_eq!(op.apply(a, b), Ok(want));
    }

    #[test]
    fn unknown_operation_is_a_failure_not_a_panic() {
        let op = Operation::parse("divide");
        assert_eq!(
            op.apply(5, 0),
            Err(FailureReason::UnknownOperation("divide".to_string()))
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(Operation::Add.apply(i64::MAX, 1), Err(FailureReason::Overflow));
        assert_eq!(Operation::Multiply.apply(i64::MIN, -1), Err(FailureReason::Overflow));
    }

    #[test]
    fn serializes_as_snake_case() {
        let s = serde_json::to_string(&Operation::Multiply).unwrap();
        assert_eq!(s, "\"multiply\"");

        let other = serde_json::to_value(Operation::Other("pow".to_string())).unwrap();
        assert_eq!(other, serde_json::json!({"other": "pow"}));
    }
}
