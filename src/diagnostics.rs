use std::fmt;

use itertools::Itertools;

/// Source pairs a piece of input text with the name diagnostics should be
/// attributed to. Byte offsets into the text are resolved to line/column
/// locations on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> Source<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// location resolves a byte offset to a 1-based (line, column) pair.
    /// Offsets past the end of the text resolve to one past the last column.
    pub fn location(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for (index, ch) in self.text.char_indices() {
            if index >= pos {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    fn describe(&self, diagnostic: &Diagnostic) -> String {
        let (line, column) = self.location(diagnostic.pos);
        if self.name.is_empty() {
            format!("{}:{}: {}", line, column, diagnostic.message)
        } else {
            format!("{}:{}:{}: {}", self.name, line, column, diagnostic.message)
        }
    }
}

/// A positioned error message produced during parsing or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub pos: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "offset {}: {}", self.pos, self.message)
    }
}

/// Diagnostics is an ordered, append-only sink of positioned messages.
/// One sink is created per top-level evaluation and shared between the
/// parser and the evaluator.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, pos: usize, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            pos,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// render formats every entry against `source`, one per line.
    pub fn render(&self, source: &Source) -> String {
        self.entries
            .iter()
            .map(|diagnostic| source.describe(diagnostic))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_resolve_locations() {
        let source = Source::new("test.calc", "(+ 1 2)\n(+ 3\n   4)");
        assert_eq!(source.location(0), (1, 1));
        assert_eq!(source.location(5), (1, 6));
        assert_eq!(source.location(8), (2, 1));
        assert_eq!(source.location(16), (3, 4));
        // past the end
        assert_eq!(source.location(1000), (3, 6));
    }

    #[test]
    fn can_render_diagnostics() {
        let source = Source::new("test.calc", "abc\ndef");
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.report(0, "first problem");
        diagnostics.report(4, "second problem");
        assert_eq!(diagnostics.len(), 2);

        let rendered = diagnostics.render(&source);
        assert_eq!(
            rendered,
            "test.calc:1:1: first problem\ntest.calc:2:1: second problem"
        );
    }

    #[test]
    fn renders_without_a_name() {
        let source = Source::new("", "abc");
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(1, "oops");
        assert_eq!(diagnostics.render(&source), "1:2: oops");
    }
}
