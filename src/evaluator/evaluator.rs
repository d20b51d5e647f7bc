use std::io;

use itertools::Itertools;

use super::builtins;
use super::env::Env;
use super::value::{Failure, Fault, Value};
use crate::diagnostics::Diagnostics;
use crate::reader::Node;

/// Evaluator walks a syntax tree and produces a value, threading the
/// diagnostics sink and the session's print target through the recursion.
/// One instance is built per top-level evaluation; the environment it
/// borrows outlives it and carries bindings to the next evaluation.
pub struct Evaluator<'a> {
    env: &'a mut Env,
    diagnostics: &'a mut Diagnostics,
    out: &'a mut dyn io::Write,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        env: &'a mut Env,
        diagnostics: &'a mut Diagnostics,
        out: &'a mut dyn io::Write,
    ) -> Self {
        Self {
            env,
            diagnostics,
            out,
        }
    }

    pub(crate) fn env_mut(&mut self) -> &mut Env {
        self.env
    }

    /// write_values renders `print`'s arguments: display forms separated by
    /// single spaces, with a trailing newline.
    pub(crate) fn write_values(&mut self, values: &[Value]) -> Result<(), Fault> {
        writeln!(self.out, "{}", values.iter().format(" ")).map_err(Fault::from)
    }

    /// eval dispatches on the node variant. Malformed programs surface as
    /// diagnostics and a Nothing value; only machinery failures return Err.
    pub fn eval(&mut self, node: &Node) -> Result<Value, Fault> {
        match node {
            Node::File(nodes) => self.eval_file(nodes),
            Node::Identifier { name, pos } => Ok(self.eval_identifier(name, *pos)),
            Node::Number { value, .. } => Ok(Value::Integer(*value)),
            Node::Operator { symbol, pos } => self.eval_operator(symbol, *pos),
            Node::Expression { nodes, pos } => self.eval_expression(nodes, *pos),
        }
    }

    /// Top-level nodes run in sequence and the file's value is the last
    /// node's value. This is the one place the unresolved-identifier
    /// sentinel becomes a diagnostic; it stops the file immediately.
    fn eval_file(&mut self, nodes: &[Node]) -> Result<Value, Fault> {
        let mut result = Value::Nothing;
        for node in nodes {
            result = self.eval(node)?;
            if let Value::Unresolved { name, pos } = &result {
                self.diagnostics
                    .report(*pos, format!("unknown identifier: {}", name));
                return Ok(Value::Nothing);
            }
        }
        Ok(result)
    }

    fn eval_identifier(&mut self, name: &str, pos: usize) -> Value {
        match self.env.resolve(name) {
            Some(value) => value,
            None => Value::Unresolved {
                name: name.into(),
                pos,
            },
        }
    }

    fn eval_operator(&mut self, symbol: &str, pos: usize) -> Result<Value, Fault> {
        match builtins::lookup(symbol) {
            Some(builtin) => Ok(Value::Callable(builtin)),
            // the lexer only emits operator tokens for registered spellings,
            // so a miss here is a contract violation, not a user error
            None => Err(Fault::UnknownOperator {
                symbol: symbol.into(),
                pos,
            }),
        }
    }

    fn eval_expression(&mut self, nodes: &[Node], pos: usize) -> Result<Value, Fault> {
        let (head, rest) = match nodes.split_first() {
            Some(split) => split,
            None => {
                self.diagnostics.report(pos, "empty expression not allowed");
                return Ok(Value::Nothing);
            }
        };

        let builtin = match self.eval(head)? {
            Value::Callable(builtin) => builtin,
            _ => {
                self.diagnostics.report(
                    head.pos(),
                    "first element of an expression must be a function",
                );
                return Ok(Value::Nothing);
            }
        };

        let mut args = Vec::with_capacity(rest.len());
        for node in rest {
            args.push(self.eval(node)?);
        }

        match builtin.run(self, args) {
            Ok(value) => Ok(value),
            Err(Failure::Error(error)) => {
                self.diagnostics.report(pos, error.to_string());
                Ok(Value::Nothing)
            }
            Err(Failure::Fault(fault)) => Err(fault),
        }
    }
}
