use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;

use lazy_static::lazy_static;

use super::evaluator::Evaluator;
use super::value::{EvalError, Failure, Value};

pub(crate) type BuiltinFn = fn(&mut Evaluator<'_>, Vec<Value>) -> Result<Value, Failure>;

/// Builtin is an entry of the fixed primitive-operation table. Builtins are
/// consulted ahead of any user definition during identifier resolution, so a
/// user can never shadow one.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    run: BuiltinFn,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn run(
        &self,
        evaluator: &mut Evaluator<'_>,
        args: Vec<Value>,
    ) -> Result<Value, Failure> {
        (self.run)(evaluator, args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = {
        let entries: &[(&'static str, BuiltinFn)] = &[
            ("+", add),
            ("-", sub),
            ("*", mul),
            ("/", div),
            ("%", rem),
            ("=", eq),
            ("<", less),
            ("<=", less_eq),
            (">", greater),
            (">=", greater_eq),
            ("<>", not_eq),
            ("define", define),
            ("set", set),
            ("if", branch),
            ("print", print),
        ];

        let mut table = HashMap::new();
        for &(name, run) in entries {
            table.insert(name, Builtin { name, run });
        }
        table
    };
}

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

/// expect_int coerces a fold operand, treating an unresolved identifier as
/// its own error rather than a type mismatch.
fn expect_int(name: &'static str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Unresolved { name, .. } => Err(EvalError::UnknownIdentifier(name.clone())),
        other => Err(EvalError::OperandType {
            name,
            got: other.kind().into(),
        }),
    }
}

/// fold runs the shared shape of the arithmetic and comparison builtins: a
/// left fold from the first operand. No operands yields Nothing; a single
/// operand is returned unchanged.
fn fold(
    name: &'static str,
    args: Vec<Value>,
    op: fn(i64, i64) -> Result<i64, EvalError>,
) -> Result<Value, Failure> {
    let (first, rest) = match args.split_first() {
        Some(split) => split,
        None => return Ok(Value::Nothing),
    };

    let mut acc = expect_int(name, first)?;
    for arg in rest {
        acc = op(acc, expect_int(name, arg)?)?;
    }
    Ok(Value::Integer(acc))
}

fn add(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("+", args, |a, b| Ok(a.wrapping_add(b)))
}

fn sub(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("-", args, |a, b| Ok(a.wrapping_sub(b)))
}

fn mul(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("*", args, |a, b| Ok(a.wrapping_mul(b)))
}

fn div(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("/", args, |a, b| {
        if b == 0 {
            Err(EvalError::DivisionByZero)
        } else {
            // truncates toward zero
            Ok(a.wrapping_div(b))
        }
    })
}

fn rem(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("%", args, |a, b| {
        if b == 0 {
            Err(EvalError::DivisionByZero)
        } else {
            Ok(a.wrapping_rem(b))
        }
    })
}

fn eq(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("=", args, |a, b| Ok((a == b) as i64))
}

fn less(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("<", args, |a, b| Ok((a < b) as i64))
}

fn less_eq(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("<=", args, |a, b| Ok((a <= b) as i64))
}

fn greater(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold(">", args, |a, b| Ok((a > b) as i64))
}

fn greater_eq(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold(">=", args, |a, b| Ok((a >= b) as i64))
}

fn not_eq(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    fold("<>", args, |a, b| Ok((a != b) as i64))
}

/// bind_args validates the shared (name, value) shape of `define` and `set`.
/// The name must arrive as the unresolved-identifier sentinel, the only way
/// a bare name reaches a builtin, since bound identifiers evaluate to their
/// values before the call.
fn bind_args(name: &'static str, args: Vec<Value>) -> Result<(String, Value), EvalError> {
    let [target, value] = <[Value; 2]>::try_from(args).map_err(|args| EvalError::Arity {
        name,
        expected: 2,
        got: args.len(),
    })?;

    let bound = match target {
        Value::Unresolved { name, .. } => name,
        other => {
            return Err(EvalError::BindTarget {
                name,
                got: other.kind().into(),
            })
        }
    };

    match value {
        Value::Callable(_) => Err(EvalError::BindOperator { name }),
        Value::Unresolved { name: other, .. } => Err(EvalError::UnknownIdentifier(other)),
        value => Ok((bound, value)),
    }
}

// (define <name> <value>)
//
// The value is captured eagerly: the name keeps resolving to it no matter
// how the environment changes afterwards.
fn define(evaluator: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    let (name, value) = bind_args("define", args)?;
    evaluator.env_mut().define(name, Rc::new(value));
    Ok(Value::Nothing)
}

// (set <name> <value>)
fn set(evaluator: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    let (name, value) = bind_args("set", args)?;
    evaluator.env_mut().set(name, value);
    Ok(Value::Nothing)
}

// (if <condition> <then> <else>)
//
// Both branches arrive already evaluated; `if` only selects between their
// values. Zero selects the else branch, any other integer the then branch.
fn branch(_: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    let [condition, then, otherwise] =
        <[Value; 3]>::try_from(args).map_err(|args| EvalError::Arity {
            name: "if",
            expected: 3,
            got: args.len(),
        })?;

    match condition {
        Value::Integer(0) => Ok(otherwise),
        Value::Integer(_) => Ok(then),
        Value::Unresolved { name, .. } => Err(EvalError::UnknownIdentifier(name).into()),
        other => Err(EvalError::OperandType {
            name: "if",
            got: other.kind().into(),
        }
        .into()),
    }
}

// (print <value>...)
fn print(evaluator: &mut Evaluator<'_>, args: Vec<Value>) -> Result<Value, Failure> {
    for arg in &args {
        if let Value::Unresolved { name, .. } = arg {
            return Err(EvalError::UnknownIdentifier(name.clone()).into());
        }
    }
    evaluator.write_values(&args)?;
    Ok(Value::Nothing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::OPERATORS;

    #[test]
    fn every_operator_spelling_has_a_builtin() {
        // the lexer guarantees operator tokens come from OPERATORS; this
        // pins the other half of the contract the evaluator relies on
        for spelling in OPERATORS {
            assert!(
                lookup(spelling).is_some(),
                "no builtin registered for {}",
                spelling
            );
        }
    }

    #[test]
    fn named_forms_are_registered() {
        for name in &["define", "set", "if", "print"] {
            assert!(lookup(name).is_some());
        }
        assert!(lookup("missing").is_none());
    }

    #[test]
    fn bind_args_validates_shape() {
        let unresolved = Value::Unresolved {
            name: "x".into(),
            pos: 0,
        };

        assert_eq!(
            bind_args("set", vec![unresolved.clone(), Value::Integer(5)]),
            Ok(("x".into(), Value::Integer(5)))
        );

        assert_eq!(
            bind_args("set", vec![Value::Integer(1)]),
            Err(EvalError::Arity {
                name: "set",
                expected: 2,
                got: 1
            })
        );

        assert_eq!(
            bind_args("set", vec![Value::Integer(1), Value::Integer(2)]),
            Err(EvalError::BindTarget {
                name: "set",
                got: "an integer".into()
            })
        );

        let operator = Value::Callable(lookup("+").unwrap());
        assert_eq!(
            bind_args("define", vec![unresolved, operator]),
            Err(EvalError::BindOperator { name: "define" })
        );
    }
}
