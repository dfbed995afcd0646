//! Lexer for Eva source text
//!
//! Produces a flat token stream terminated by [`TokenKind::Eof`].

mod tokens;

pub use tokens::{Token, TokenKind};

use crate::common::Span;
use crate::diagnostics::{SourceFile, SyntaxError};
use logos::Logos;

/// Lex an anonymous source string
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    lex_file(&SourceFile::new("<input>", source))
}

/// Lex a named source file
pub fn lex_file(file: &SourceFile) -> Result<Vec<Token>, SyntaxError> {
    let source: &str = &file.content;
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(kind) => {
                let text = lexer.slice().to_string();
                // `3x` or `1e5` would otherwise read as two operands
                if let Some(prev) = tokens.last().filter(|prev: &&Token| {
                    prev.kind.is_atom() && kind.is_atom() && prev.span.end == span.start
                }) {
                    return Err(SyntaxError::InvalidToken {
                        text: format!("{}{}", prev.text, text),
                        span: prev.span.merge(span).into(),
                        src: file.to_named_source(),
                    });
                }
                tokens.push(Token { kind, span, text });
            }
            Err(()) => {
                return Err(SyntaxError::InvalidToken {
                    text: lexer.slice().to_string(),
                    span: span.into(),
                    src: file.to_named_source(),
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(source.len()),
        text: String::new(),
    });

    tracing::trace!("Lexed {} tokens from {}", tokens.len(), file.name);
    Ok(tokens)
}

/// Decode the body of a string literal token, stripping the delimiters and
/// resolving escapes. Unknown escapes keep the escaped character.
pub fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Render `value` as a string literal that [`unquote`] reads back
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
