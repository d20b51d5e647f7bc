use std::collections::HashSet;
use std::iter;
use std::result;
use std::str;

use lazy_static::lazy_static;

const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';
const COMMENT_CHAR: char = ';';
const NEWLINE_CHAR: char = '\n';

/// OPERATORS are the recognized operator spellings. Every entry has a
/// corresponding builtin; the evaluator relies on the lexer only ever
/// producing operator tokens from this list.
pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "<", "<=", ">", ">=", "<>",
];

lazy_static! {
    /// OPERATOR_CHARS are the characters an operator token can be built from.
    static ref OPERATOR_CHARS: HashSet<char> = {
        let mut set = HashSet::new();

        for spelling in OPERATORS {
            for ch in spelling.chars() {
                set.insert(ch);
            }
        }

        set
    };
}

/// Result binds the std::result::Result::Err type to this module's error type.
pub type Result<T> = result::Result<T, Error>;

/// lex is a convenience function to take some `input` and produce the resulting `Vec<Token>`.
pub fn lex(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokens()
}

/// Error represents an error the lexer encountered while lexing.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// UnrecognizedCharacter points to the byte in the input stream where a character outside the language was found
    UnrecognizedCharacter(usize, char),
    /// UnknownOperator points to the byte in the input stream where an operator-like run matched no operator spelling
    UnknownOperator(usize, String),
    // Internal represents a bug in the internal consistency of this module's logic.
    // An example is where we know a subsequent lex will succeed for some syntactic category due to checking with `peek` but still need an Option for other failable lexes.
    Internal,
}

/// Token is an atomic component of the calculator syntax, tagged with the
/// byte offset where it begins.
#[derive(Debug, PartialEq, Clone)]
pub struct Token<'input> {
    pub pos: usize,
    pub kind: TokenKind<'input>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind<'input> {
    Open,
    Close,
    Number(&'input str),
    Operator(&'input str),
    Identifier(&'input str),
    Comment(&'input str),
}

/// Lexer contains the logic to lex individual tokens from the input source.
#[derive(Debug)]
pub struct Lexer<'input> {
    input: &'input str,
    iter: iter::Peekable<str::CharIndices<'input>>,
}

impl<'input> Lexer<'input> {
    /// new constructs a Lexer instance from the input but does not do any lexing.
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            iter: input.char_indices().peekable(),
        }
    }

    /// tokens is a convenience method that returns the tokens lexed from the input stream.
    fn tokens(self) -> Result<Vec<Token<'input>>> {
        self.collect::<result::Result<Vec<_>, _>>()
    }

    /// advance_if advances the state of the lexer while chars satisfy the
    /// `predicate`. Returns Some(span) of bytes that was advanced over, with
    /// an exclusive end; returns None if no char satisfied the predicate.
    fn advance_if<P>(&mut self, predicate: P) -> Option<(usize, usize)>
    where
        P: Fn(char) -> bool,
    {
        let (start, first) = match self.peek() {
            Some(&(index, ch)) if predicate(ch) => {
                self.consume();
                (index, ch)
            }
            _ => return None,
        };
        let mut end = start + first.len_utf8();

        while let Some(&(index, ch)) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.consume();
            end = index + ch.len_utf8();
        }

        Some((start, end))
    }

    /// consume advances the state of the lexer to the next char, yielding an Option of the current char from the input source
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }

    /// peek returns the next element in the iterator without consuming it
    fn peek(&mut self) -> Option<&(usize, char)> {
        self.iter.peek()
    }

    /// take_while advances the input while `predicate` is true and then returns a str slice of the traversed span.
    fn take_while<P>(&mut self, predicate: P) -> Option<&'input str>
    where
        P: Fn(char) -> bool,
    {
        self.advance_if(predicate)
            .map(|(start, end)| &self.input[start..end])
    }

    fn is_numeric(ch: char) -> bool {
        ch.is_ascii_digit()
    }

    fn consume_number(&mut self, pos: usize) -> Result<Token<'input>> {
        self.take_while(Lexer::is_numeric)
            .map(|text| Token {
                pos,
                kind: TokenKind::Number(text),
            })
            .ok_or(Error::Internal)
    }

    fn is_operator(ch: char) -> bool {
        OPERATOR_CHARS.contains(&ch)
    }

    fn consume_operator(&mut self, pos: usize) -> Result<Token<'input>> {
        let text = self.take_while(Lexer::is_operator).ok_or(Error::Internal)?;
        if OPERATORS.contains(&text) {
            Ok(Token {
                pos,
                kind: TokenKind::Operator(text),
            })
        } else {
            Err(Error::UnknownOperator(pos, text.into()))
        }
    }

    fn is_identifier_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_identifier(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    fn consume_identifier(&mut self, pos: usize) -> Result<Token<'input>> {
        self.take_while(Lexer::is_identifier)
            .map(|text| Token {
                pos,
                kind: TokenKind::Identifier(text),
            })
            .ok_or(Error::Internal)
    }

    fn consume_comment(&mut self, pos: usize) -> Result<Token<'input>> {
        self.consume();
        let text = self.take_while(|ch| ch != NEWLINE_CHAR).unwrap_or("");
        Ok(Token {
            pos,
            kind: TokenKind::Comment(text),
        })
    }

    fn consume_delimiter(&mut self, pos: usize, kind: TokenKind<'input>) -> Result<Token<'input>> {
        self.consume();
        Ok(Token { pos, kind })
    }

    fn is_whitespace(ch: char) -> bool {
        ch.is_whitespace()
    }
}

impl<'a> iter::Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance_if(Lexer::is_whitespace);

        let (pos, ch) = match self.peek() {
            Some(&(pos, ch)) => (pos, ch),
            None => return None,
        };

        let next_token = match ch {
            OPEN_PAREN => self.consume_delimiter(pos, TokenKind::Open),
            CLOSE_PAREN => self.consume_delimiter(pos, TokenKind::Close),
            COMMENT_CHAR => self.consume_comment(pos),
            ch if Lexer::is_numeric(ch) => self.consume_number(pos),
            ch if Lexer::is_operator(ch) => self.consume_operator(pos),
            ch if Lexer::is_identifier_start(ch) => self.consume_identifier(pos),
            ch => {
                self.consume();
                Err(Error::UnrecognizedCharacter(pos, ch))
            }
        };
        Some(next_token)
    }
}
