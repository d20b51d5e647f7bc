use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use itertools::Itertools;

use super::builtins;
use super::value::Value;

/// Env holds a session's two user-facing namespaces: `variables`, written by
/// `set`, and `functions`, written by `define`. The same name may exist in
/// both (and collide with a builtin); resolution order is builtins, then
/// functions, then variables. There is no nesting and no removal.
///
/// A `functions` entry is the value captured when the definition was
/// evaluated, shared behind an `Rc` so resolution never re-runs anything.
#[derive(Debug, Default)]
pub struct Env {
    variables: HashMap<String, Value>,
    functions: HashMap<String, Rc<Value>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// resolve produces the value an identifier evaluates to, or None if the
    /// name is bound in no namespace.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        if let Some(builtin) = builtins::lookup(name) {
            return Some(Value::Callable(builtin));
        }
        if let Some(value) = self.functions.get(name) {
            return Some((**value).clone());
        }
        self.variables.get(name).cloned()
    }

    /// define overwrites any existing `functions` entry for `name`.
    pub fn define(&mut self, name: impl Into<String>, value: Rc<Value>) {
        self.functions.insert(name.into(), value);
    }

    /// set overwrites any existing `variables` entry for `name`.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Env {{")?;
        write!(
            f,
            "{}",
            self.functions
                .iter()
                .map(|(k, v)| format!("{:?} {}", k, v))
                .chain(
                    self.variables
                        .iter()
                        .map(|(k, v)| format!("{:?} {}", k, v))
                )
                .format(" ")
        )?;
        write!(f, "}}")
    }
}
