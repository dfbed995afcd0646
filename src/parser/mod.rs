//! Parser for the Eva language
//!
//! A recursive descent parser that turns a token stream into list-structured
//! [`Expr`] trees. Programs made of several top-level expressions are wrapped
//! in an implicit `(begin ...)` by [`parse_body`].

use crate::ast::Expr;
use crate::common::Span;
use crate::diagnostics::{SourceFile, SyntaxError};
use crate::lexer::{self, Token, TokenKind};

/// Parse a token stream holding exactly one expression
pub fn parse(tokens: &[Token], file: &SourceFile) -> Result<Expr, SyntaxError> {
    let mut parser = Parser::new(tokens, file);
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Parse a single expression from an anonymous source string
pub fn parse_expr(source: &str) -> Result<Expr, SyntaxError> {
    let file = SourceFile::new("<input>", source);
    let tokens = lexer::lex_file(&file)?;
    parse(&tokens, &file)
}

/// Parse every top-level expression of a source file
pub fn parse_program(file: &SourceFile) -> Result<Vec<Expr>, SyntaxError> {
    let tokens = lexer::lex_file(file)?;
    let mut parser = Parser::new(&tokens, file);
    let mut exprs = Vec::new();
    while !parser.at(TokenKind::Eof) {
        exprs.push(parser.parse_expr()?);
    }
    tracing::debug!("Parsed {} top-level expressions from {}", exprs.len(), file.name);
    Ok(exprs)
}

/// Parse a source file as the body of an implicit `begin` block
pub fn parse_body(file: &SourceFile) -> Result<Expr, SyntaxError> {
    let exprs = parse_program(file)?;
    Ok(Expr::tagged("begin", exprs))
}

/// Parser state
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    file: &'a SourceFile,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], file: &'a SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            file,
        }
    }

    fn current(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        tokens
            .get(self.pos)
            .or_else(|| tokens.last())
            .expect("token stream should have at least EOF")
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) -> &'a Token {
        let tok = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_eof(&self) -> Result<(), SyntaxError> {
        if self.at(TokenKind::Eof) {
            Ok(())
        } else {
            Err(SyntaxError::TrailingInput {
                span: self.current().span.into(),
                src: self.file.to_named_source(),
            })
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::LParen => self.parse_list(tok.span),
            TokenKind::Number => self.parse_number(tok),
            TokenKind::String => Ok(Expr::Str(lexer::unquote(&tok.text))),
            TokenKind::Symbol => Ok(Expr::Symbol(tok.text.clone())),
            TokenKind::RParen => Err(SyntaxError::UnmatchedParen {
                span: tok.span.into(),
                src: self.file.to_named_source(),
            }),
            TokenKind::Eof => Err(SyntaxError::UnexpectedToken {
                expected: "an expression".to_string(),
                found: TokenKind::Eof.to_string(),
                span: tok.span.into(),
                src: self.file.to_named_source(),
            }),
        }
    }

    /// Parse list elements after the opening paren at `open`
    fn parse_list(&mut self, open: Span) -> Result<Expr, SyntaxError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                TokenKind::RParen => {
                    self.advance();
                    return Ok(Expr::List(items));
                }
                TokenKind::Eof => {
                    return Err(SyntaxError::UnexpectedEof {
                        span: open.merge(self.current().span).into(),
                        src: self.file.to_named_source(),
                    });
                }
                _ => items.push(self.parse_expr()?),
            }
        }
    }

    fn parse_number(&self, tok: &Token) -> Result<Expr, SyntaxError> {
        tok.text
            .parse::<f64>()
            .map(Expr::Number)
            .map_err(|_| SyntaxError::UnexpectedToken {
                expected: "a number".to_string(),
                found: tok.text.clone(),
                span: tok.span.into(),
                src: self.file.to_named_source(),
            })
    }
}
