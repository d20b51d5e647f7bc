use std::fmt;
use std::io;

use thiserror::Error;

use super::builtins::Builtin;

/// Value is the result of evaluating any syntax node.
///
/// `Unresolved` is a sentinel, not an error: an identifier bound in no
/// namespace evaluates to it and it flows as a plain value until a boundary
/// gives it meaning, either the top level of a file or a builtin receiving
/// it as an operand.
///
/// Only builtins appear as `Callable`: a name bound by `define` resolves
/// straight to the value captured at definition time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Callable(Builtin),
    Unresolved { name: String, pos: usize },
    Nothing,
}

impl Value {
    /// kind names the value's category for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "an integer",
            Value::Callable(_) => "a function",
            Value::Unresolved { .. } => "an unbound identifier",
            Value::Nothing => "nothing",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Callable(builtin) => write!(f, "#<builtin {}>", builtin.name()),
            Value::Unresolved { name, .. } => write!(f, "{}", name),
            Value::Nothing => write!(f, "nothing"),
        }
    }
}

/// EvalError is a malformed-call error signaled by a builtin. The evaluator
/// converts it into a positioned diagnostic at the calling expression; it is
/// fatal to the current top-level result but not to the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{name} expects {expected} arguments, got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{name} expects integer operands, got {got}")]
    OperandType { name: &'static str, got: String },
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
    #[error("{name} expects an identifier to bind, got {got}")]
    BindTarget { name: &'static str, got: String },
    #[error("{name} cannot bind an operator")]
    BindOperator { name: &'static str },
    #[error("division by zero")]
    DivisionByZero,
}

/// Fault is an unrecoverable failure of the evaluation machinery itself.
/// Unlike an `EvalError` it never becomes a source diagnostic; it aborts the
/// current evaluation and surfaces to the caller as an `Err`.
#[derive(Debug, Error)]
pub enum Fault {
    /// The parser only emits operator nodes for registered spellings, so a
    /// table miss is a parser/evaluator contract violation.
    #[error("no builtin registered for operator `{symbol}`")]
    UnknownOperator { symbol: String, pos: usize },
    #[error("write to output failed: {0}")]
    Io(#[from] io::Error),
}

/// Failure is what a builtin invocation can produce: an error to report, or
/// a fault to abort with.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Error(#[from] EvalError),
    #[error(transparent)]
    Fault(#[from] Fault),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::builtins;

    #[test]
    fn can_display_values() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Nothing.to_string(), "nothing");
        assert_eq!(
            Value::Unresolved {
                name: "x".into(),
                pos: 0
            }
            .to_string(),
            "x"
        );

        let builtin = builtins::lookup("+").unwrap();
        assert_eq!(Value::Callable(builtin).to_string(), "#<builtin +>");
    }

    #[test]
    fn callables_compare_by_name() {
        let add = Value::Callable(builtins::lookup("+").unwrap());
        let sub = Value::Callable(builtins::lookup("-").unwrap());
        assert_eq!(add, Value::Callable(builtins::lookup("+").unwrap()));
        assert_ne!(add, sub);
    }
}
