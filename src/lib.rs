pub mod diagnostics;
pub mod evaluator;
pub mod printer;
pub mod reader;
pub mod repl;

pub use crate::diagnostics::{Diagnostic, Diagnostics, Source};
pub use crate::evaluator::{eval_expr, eval_file, Fault, Session, Value};
