//! clex Lexer
//!
//! Tokenizes C-like source bytes into a stream of tokens.
//! Handles maximal-munch punctuators (digraphs included), keywords with
//! word-boundary checks, identifiers with universal character names,
//! string and character literals with escapes, and decimal constants.
//!
//! Lexical defects do not stop the scan: each one produces a
//! [`Diagnostic`] and scanning resumes after it.
//!
//! # Example
//!
//! ```
//! use clex_lexer::{Punctuator, Scanner, TokenKind};
//!
//! let lexed = Scanner::tokenize(b"x <<= 2;");
//! assert!(lexed.diagnostics.is_empty());
//! let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind.clone()).collect();
//! assert_eq!(kinds[1], TokenKind::Punctuator(Punctuator::LShiftEq));
//! ```

pub mod chars;
pub mod diagnostic;
pub mod lexeme;
pub mod scanner;
pub mod stream;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticSink, WriteSink};
pub use lexeme::{Keyword, Punctuator};
pub use scanner::{scan_chunks, Lexed, Scanner};
pub use stream::TokenStream;
pub use token::{Span, Token, TokenKind};

/// Lexer error with position information.
///
/// `offset` is the byte index of the offending byte in the scanned buffer;
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unknown character '{}'", .0.escape_ascii())]
    UnknownCharacter(u8),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character constant")]
    UnterminatedChar,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("byte '{}' must be escaped in a string literal", .0.escape_ascii())]
    InvalidStringCharacter(u8),
    #[error("integer constant is too large")]
    IntegerOverflow,
}
