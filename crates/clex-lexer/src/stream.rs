//! Ordered, append-only token storage.

use std::fmt;

use crate::token::Token;

/// Tokens in source order.
///
/// Only the scanner appends. Consumers walk it front to back with
/// [`TokenStream::iter`] or by value through `IntoIterator`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Compact single-line rendering: `(tok)(tok)...`.
    pub fn groups(&self) -> Groups<'_> {
        Groups(self)
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// One token per line.
impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self {
            writeln!(f, "{token}")?;
        }
        Ok(())
    }
}

/// See [`TokenStream::groups`].
pub struct Groups<'a>(&'a TokenStream);

impl fmt::Display for Groups<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.0 {
            write!(f, "({})", token.kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexeme::Punctuator;
    use crate::token::{Span, TokenKind};

    fn stream(kinds: Vec<TokenKind>) -> TokenStream {
        let mut stream = TokenStream::new();
        for (i, kind) in kinds.into_iter().enumerate() {
            stream.push(Token::new(kind, Span::new(i, i + 1, 1, i + 1)));
        }
        stream
    }

    #[test]
    fn test_empty_stream() {
        let s = TokenStream::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.to_string(), "");
        assert_eq!(s.groups().to_string(), "");
    }

    #[test]
    fn test_append_order_preserved() {
        let s = stream(vec![
            TokenKind::Identifier("a".into()),
            TokenKind::Punctuator(Punctuator::Plus),
            TokenKind::IntegerConstant(1),
        ]);
        let columns: Vec<usize> = s.iter().map(|t| t.span.column).collect();
        assert_eq!(columns, vec![1, 2, 3]);
        assert_eq!(
            s.iter().last().map(|t| &t.kind),
            Some(&TokenKind::IntegerConstant(1))
        );
    }

    #[test]
    fn test_listing_and_groups() {
        let s = stream(vec![
            TokenKind::Identifier("a".into()),
            TokenKind::Punctuator(Punctuator::Semicolon),
        ]);
        assert_eq!(s.to_string(), "1:1 IDENTIFIER(a)\n1:2 SEMICOLON\n");
        assert_eq!(s.groups().to_string(), "(IDENTIFIER(a))(SEMICOLON)");
    }

    #[test]
    fn test_into_iter_moves_tokens() {
        let s = stream(vec![TokenKind::StringLiteral("x".into())]);
        let kinds: Vec<TokenKind> = s.into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::StringLiteral("x".into())]);
    }
}
