//! Token definitions for the Eva lexer

use crate::common::Span;
use logos::Logos;

/// A token with its kind, span, and text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

/// Token kinds recognized by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
pub enum TokenKind {
    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // Literals (priority over Symbol so `-5` is a number, not a name)
    #[regex(r"-?[0-9]+(\.[0-9]+)?", priority = 3)]
    Number,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // Identifiers and operators
    #[regex(r"[+\-*/%<>=!a-zA-Z_][+\-*/%<>=!a-zA-Z0-9_]*")]
    Symbol,

    // Special
    Eof,
}

impl TokenKind {
    /// Numbers, strings and symbols must be separated from each other by
    /// whitespace or parentheses
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Symbol
        )
    }

    /// Get the string representation of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Number => "<number>",
            TokenKind::String => "<string>",
            TokenKind::Symbol => "<symbol>",
            TokenKind::Eof => "<eof>",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
