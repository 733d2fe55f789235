use std::fmt;

use crate::lexeme::{Keyword, Punctuator};

/// A position in source text, tracking line and column for error reporting.
///
/// `start..end` is the byte range in the scanned buffer. `line` and
/// `column` are 1-based; the column counts bytes from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Token classification.
///
/// Data-carrying variants embed their value directly. Only `Identifier`
/// and `StringLiteral` own heap text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Punctuator(Punctuator),
    /// Spelling as written, universal character names included.
    Identifier(String),
    /// Decoded contents, without quotes or the `L` prefix.
    StringLiteral(String),
    IntegerConstant(i64),
    NumberConstant(f64),
    CharConstant(u8),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "KEYWORD({kw})"),
            TokenKind::Punctuator(p) => write!(f, "{p}"),
            TokenKind::Identifier(name) => write!(f, "IDENTIFIER({name})"),
            TokenKind::StringLiteral(text) => write!(f, "STRING({text:?})"),
            TokenKind::IntegerConstant(n) => write!(f, "INTEGER({n})"),
            TokenKind::NumberConstant(x) => write!(f, "NUMBER({x})"),
            TokenKind::CharConstant(c) => {
                if c.is_ascii_graphic() || *c == b' ' {
                    write!(f, "CHAR('{}')", *c as char)
                } else {
                    write!(f, "CHAR({c})")
                }
            }
        }
    }
}

/// A token produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.span.line, self.span.column, self.kind)
    }
}
