mod lexer;
mod parser;

pub use self::lexer::{lex, OPERATORS};
pub use self::parser::{Node, Parser};

use crate::diagnostics::Diagnostics;

/// read parses `input` into a syntax tree, reporting syntax errors to
/// `diagnostics`. A (possibly partial) tree is always returned.
pub fn read(input: &str, diagnostics: &mut Diagnostics) -> Node {
    Parser::new(input).parse(diagnostics)
}
