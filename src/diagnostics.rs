//! Diagnostic reporting with source locations
//!
//! Syntax errors carry spans into the offending source so miette can render
//! them with labels. Runtime errors are raised by the evaluator and propagate
//! unchanged to the embedding.

use crate::common::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Errors raised while turning source text into expressions
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SyntaxError {
    #[error("Invalid token `{text}`")]
    #[diagnostic(
        code(syntax::invalid_token),
        help("identifiers may only contain letters, digits, `_` and the operator characters `+-*/%<>=!`")
    )]
    InvalidToken {
        text: String,
        #[label("not a valid token")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected token: expected {expected}, found {found}")]
    #[diagnostic(code(syntax::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected end of input")]
    #[diagnostic(code(syntax::unexpected_eof), help("add the missing `)`"))]
    UnexpectedEof {
        #[label("this list is never closed")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unmatched `)`")]
    #[diagnostic(code(syntax::unmatched_paren))]
    UnmatchedParen {
        #[label("no list to close here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected input after the expression")]
    #[diagnostic(
        code(syntax::trailing_input),
        help("wrap multiple expressions in `(begin ...)`")
    )]
    TrailingInput {
        #[label("expected end of input")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

/// Errors raised while evaluating expressions
#[derive(Error, Debug, Diagnostic)]
pub enum RuntimeError {
    #[error("Unresolved reference `{name}`")]
    #[diagnostic(
        code(eval::unresolved_reference),
        help("declare it first with `(var {name} ...)`")
    )]
    UnresolvedReference { name: String },

    #[error("Unimplemented form: {expr}")]
    #[diagnostic(code(eval::unimplemented_form))]
    UnimplementedForm { expr: String },

    #[error("Malformed `{form}` form: {reason}")]
    #[diagnostic(code(eval::malformed_form))]
    MalformedForm { form: String, reason: String },

    #[error("Empty block: `(begin)` has no expression to produce a value")]
    #[diagnostic(code(eval::empty_block))]
    EmptyBlock,

    #[error("Division by zero in `{op}`")]
    #[diagnostic(code(eval::division_by_zero))]
    DivisionByZero { op: String },

    #[error("Value of type {type_name} is not callable: {value}")]
    #[diagnostic(code(eval::not_callable))]
    NotCallable {
        value: String,
        type_name: &'static str,
    },

    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    #[diagnostic(code(eval::type_mismatch))]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("`{name}` expects {expected} argument(s), got {found}")]
    #[diagnostic(code(eval::arity_mismatch))]
    ArityMismatch {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("Module `{name}` not found")]
    #[diagnostic(code(eval::module_not_found))]
    ModuleNotFound {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to read module `{name}` from {}", .path.display())]
    #[diagnostic(code(eval::module_io))]
    ModuleIo {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Module `{name}` has a syntax error")]
    #[diagnostic(code(eval::module_syntax))]
    ModuleSyntax {
        name: String,
        #[source]
        #[diagnostic_source]
        error: SyntaxError,
    },
}

/// Result of evaluating an expression
pub type EvalResult<T> = Result<T, RuntimeError>;

impl RuntimeError {
    pub fn type_mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        RuntimeError::TypeMismatch {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
