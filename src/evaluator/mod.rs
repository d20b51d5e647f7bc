mod builtins;
mod env;
mod evaluator;
mod value;

use std::io;

use crate::diagnostics::{Diagnostics, Source};
use crate::reader;

pub use self::builtins::Builtin;
pub use self::env::Env;
pub use self::evaluator::Evaluator;
pub use self::value::{EvalError, Failure, Fault, Value};

/// Session owns the environment and the print target for a sequence of
/// evaluations. Bindings made by `define` and `set` persist for the life of
/// the session; independent sessions share nothing.
pub struct Session {
    env: Env,
    out: Box<dyn io::Write>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// with_output builds a session whose `print` builtin writes somewhere
    /// other than stdout.
    pub fn with_output(out: Box<dyn io::Write>) -> Self {
        Self {
            env: Env::new(),
            out,
        }
    }

    /// eval evaluates `input` under an anonymous source name.
    pub fn eval(&mut self, input: &str) -> Result<Option<Value>, Fault> {
        self.eval_file("", input)
    }

    /// eval_file parses and evaluates `input`, attributing diagnostics to
    /// `name`. Accumulated diagnostics are rendered to stderr and turn the
    /// result into None; parse diagnostics additionally skip evaluation.
    pub fn eval_file(&mut self, name: &str, input: &str) -> Result<Option<Value>, Fault> {
        let mut diagnostics = Diagnostics::new();
        let result = self.eval_with(input, &mut diagnostics)?;
        if !diagnostics.is_empty() {
            let source = Source::new(name, input);
            eprintln!("{}", diagnostics.render(&source));
            return Ok(None);
        }
        Ok(result)
    }

    /// eval_with runs the same parse-then-eval flow without rendering,
    /// leaving the sink for the caller to inspect.
    pub fn eval_with(
        &mut self,
        input: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Value>, Fault> {
        let tree = reader::read(input, diagnostics);
        if !diagnostics.is_empty() {
            return Ok(None);
        }

        let value =
            Evaluator::new(&mut self.env, diagnostics, self.out.as_mut()).eval(&tree)?;
        if !diagnostics.is_empty() {
            return Ok(None);
        }
        Ok(Some(value))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// eval_expr evaluates `input` in a fresh one-shot session.
pub fn eval_expr(input: &str) -> Result<Option<Value>, Fault> {
    Session::new().eval(input)
}

/// eval_file evaluates `input` in a fresh one-shot session, attributing
/// diagnostics to `name`.
pub fn eval_file(name: &str, input: &str) -> Result<Option<Value>, Fault> {
    Session::new().eval_file(name, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_with(session: &mut Session, input: &str) -> (Option<Value>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let result = session.eval_with(input, &mut diagnostics).unwrap();
        (result, diagnostics)
    }

    #[test]
    fn returns_the_last_top_level_value() {
        let mut session = Session::new();
        let (result, diagnostics) = eval_with(&mut session, "(+ 1 2) (+ 3 4)");
        assert!(diagnostics.is_empty());
        assert_eq!(result, Some(Value::Integer(7)));
    }

    #[test]
    fn diagnostics_turn_the_result_absent() {
        let mut session = Session::new();
        let (result, diagnostics) = eval_with(&mut session, "()");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(result, None);
    }

    #[test]
    fn parse_errors_skip_evaluation() {
        let mut session = Session::new();
        let (result, diagnostics) = eval_with(&mut session, "(set x 5");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(result, None);

        // the set never ran
        let (result, diagnostics) = eval_with(&mut session, "x");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(result, None);
    }

    #[test]
    fn bindings_persist_across_session_calls() {
        let mut session = Session::new();
        let (result, _) = eval_with(&mut session, "(set x 5)");
        assert_eq!(result, Some(Value::Nothing));

        let (result, diagnostics) = eval_with(&mut session, "x");
        assert!(diagnostics.is_empty());
        assert_eq!(result, Some(Value::Integer(5)));
    }

    #[test]
    fn one_shot_sessions_share_nothing() {
        assert_eq!(eval_expr("(set x 5)").unwrap(), Some(Value::Nothing));
        // a new one-shot session does not see x; the diagnostic is rendered
        // to stderr and the result is absent
        assert_eq!(eval_expr("x").unwrap(), None);
    }

    #[test]
    fn full_scenario_through_the_entry_point() {
        let result =
            eval_expr("(set x 3) (define double 6) (if (= x 3) (+ double 1) 0)").unwrap();
        assert_eq!(result, Some(Value::Integer(7)));
    }
}
