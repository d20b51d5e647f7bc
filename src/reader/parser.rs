use super::lexer::{Error as LexerError, Lexer, TokenKind};
use crate::diagnostics::Diagnostics;

/// Node is a piece of parsed syntax. Every variant except `File` carries the
/// byte offset it begins at; an `Expression` is positioned at its opening
/// paren. The evaluator borrows nodes read-only.
#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    File(Vec<Node>),
    Identifier { name: String, pos: usize },
    Number { value: i64, pos: usize },
    Operator { symbol: String, pos: usize },
    Expression { nodes: Vec<Node>, pos: usize },
}

impl Node {
    pub fn pos(&self) -> usize {
        match self {
            Node::File(_) => 0,
            Node::Identifier { pos, .. } => *pos,
            Node::Number { pos, .. } => *pos,
            Node::Operator { pos, .. } => *pos,
            Node::Expression { pos, .. } => *pos,
        }
    }
}

/// Parser builds a `Node::File` from the token stream, reporting syntax
/// errors against source positions. It always yields a tree; callers decide
/// whether to proceed by inspecting the diagnostics sink.
pub struct Parser<'input> {
    lexer: Lexer<'input>,
    halted: bool,
}

impl<'input> Parser<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            lexer: Lexer::new(input),
            halted: false,
        }
    }

    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Node {
        let nodes = self.parse_nodes(None, diagnostics);
        Node::File(nodes)
    }

    /// parse_nodes collects sibling nodes until the enclosing expression is
    /// closed or the input ends. `open` is the position of the enclosing
    /// `(`, or None at the top level.
    fn parse_nodes(&mut self, open: Option<usize>, diagnostics: &mut Diagnostics) -> Vec<Node> {
        let mut nodes = vec![];

        loop {
            let token = match self.lexer.next() {
                None => {
                    if let Some(pos) = open {
                        if !self.halted {
                            diagnostics.report(pos, "missing closing `)`");
                        }
                    }
                    break;
                }
                Some(Err(error)) => {
                    self.report_lexer_error(error, diagnostics);
                    self.halted = true;
                    break;
                }
                Some(Ok(token)) => token,
            };

            match token.kind {
                TokenKind::Open => {
                    let inner = self.parse_nodes(Some(token.pos), diagnostics);
                    nodes.push(Node::Expression {
                        nodes: inner,
                        pos: token.pos,
                    });
                    if self.halted {
                        break;
                    }
                }
                TokenKind::Close => {
                    if open.is_none() {
                        diagnostics.report(token.pos, "unexpected `)`");
                        continue;
                    }
                    return nodes;
                }
                TokenKind::Number(text) => match text.parse::<i64>() {
                    Ok(value) => nodes.push(Node::Number {
                        value,
                        pos: token.pos,
                    }),
                    Err(_) => diagnostics.report(token.pos, "integer literal out of range"),
                },
                TokenKind::Operator(symbol) => nodes.push(Node::Operator {
                    symbol: symbol.into(),
                    pos: token.pos,
                }),
                TokenKind::Identifier(name) => nodes.push(Node::Identifier {
                    name: name.into(),
                    pos: token.pos,
                }),
                TokenKind::Comment(_) => {}
            }
        }

        nodes
    }

    fn report_lexer_error(&mut self, error: LexerError, diagnostics: &mut Diagnostics) {
        match error {
            LexerError::UnrecognizedCharacter(pos, ch) => {
                diagnostics.report(pos, format!("unrecognized character: {:?}", ch))
            }
            LexerError::UnknownOperator(pos, symbol) => {
                diagnostics.report(pos, format!("unknown operator: {}", symbol))
            }
            LexerError::Internal => diagnostics.report(0, "internal lexer fault"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_parse(input: &str) -> (Node, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tree = Parser::new(input).parse(&mut diagnostics);
        (tree, diagnostics)
    }

    fn identifier(name: &str, pos: usize) -> Node {
        Node::Identifier {
            name: name.into(),
            pos,
        }
    }

    fn number(value: i64, pos: usize) -> Node {
        Node::Number { value, pos }
    }

    fn operator(symbol: &str, pos: usize) -> Node {
        Node::Operator {
            symbol: symbol.into(),
            pos,
        }
    }

    fn expression(nodes: Vec<Node>, pos: usize) -> Node {
        Node::Expression { nodes, pos }
    }

    macro_rules! parse_tests {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (input, expected): (&str, Vec<Node>) = $value;
                    let (tree, diagnostics) = run_parse(input);
                    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
                    assert_eq!(tree, Node::File(expected));
                }
            )*
        }
    }

    parse_tests! {
        can_parse_empty_input: ("", vec![]),
        can_parse_number: ("42", vec![number(42, 0)]),
        can_parse_numbers_multi: ("3 4 5", vec![
            number(3, 0),
            number(4, 2),
            number(5, 4),
        ]),
        can_parse_identifiers: ("x foo_bar", vec![
            identifier("x", 0),
            identifier("foo_bar", 2),
        ]),
        can_parse_bare_operator: ("+", vec![operator("+", 0)]),
        can_parse_empty_expression: ("()", vec![expression(vec![], 0)]),
        can_parse_expression: ("(+ 1 2)", vec![
            expression(vec![
                operator("+", 1),
                number(1, 3),
                number(2, 5),
            ], 0),
        ]),
        can_parse_nested_expressions: ("(if (= x 3) 1 0)", vec![
            expression(vec![
                identifier("if", 1),
                expression(vec![
                    operator("=", 5),
                    identifier("x", 7),
                    number(3, 9),
                ], 4),
                number(1, 12),
                number(0, 14),
            ], 0),
        ]),
        can_skip_comments: ("1 ; one\n2", vec![
            number(1, 0),
            number(2, 8),
        ]),
        can_parse_multiple_top_level_forms: ("(set x 3) x", vec![
            expression(vec![
                identifier("set", 1),
                identifier("x", 5),
                number(3, 7),
            ], 0),
            identifier("x", 10),
        ]),
    }

    #[test]
    fn can_report_missing_close() {
        let (tree, diagnostics) = run_parse("(+ 1 2");
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.pos, 0);
        assert_eq!(diagnostic.message, "missing closing `)`");
        // the partial tree is still produced
        assert_eq!(
            tree,
            Node::File(vec![expression(
                vec![operator("+", 1), number(1, 3), number(2, 5)],
                0
            )])
        );
    }

    #[test]
    fn can_report_nested_missing_close() {
        let (_, diagnostics) = run_parse("((");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn can_report_unexpected_close() {
        let (tree, diagnostics) = run_parse(") 1");
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.pos, 0);
        assert_eq!(diagnostic.message, "unexpected `)`");
        // parsing continues past the stray delimiter
        assert_eq!(tree, Node::File(vec![number(1, 2)]));
    }

    #[test]
    fn can_report_unknown_operator() {
        let (_, diagnostics) = run_parse("(<=> 1 2)");
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.pos, 1);
        assert_eq!(diagnostic.message, "unknown operator: <=>");
    }

    #[test]
    fn can_report_unrecognized_character() {
        let (_, diagnostics) = run_parse("(+ 1 @)");
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.pos, 5);
        assert_eq!(diagnostic.message, "unrecognized character: '@'");
    }

    #[test]
    fn can_report_out_of_range_integer() {
        let (_, diagnostics) = run_parse("99999999999999999999");
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.message, "integer literal out of range");
    }
}
