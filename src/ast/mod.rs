//! Abstract Syntax Tree for the Eva language
//!
//! Eva programs are list-structured: every compound expression is a
//! parenthesized sequence whose head is a form tag or a callee expression.
//! The parser produces [`Expr`] trees; the evaluator classifies them into
//! [`Form`]s before dispatching.

pub mod form;

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::lexer;

pub use form::{Form, SetTarget, Sugar};

/// An Eva expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// String literal, delimiters already stripped
    Str(String),
    /// Identifier: variable name, operator or form tag
    Symbol(String),
    /// Parenthesized sequence
    List(Vec<Expr>),
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn list(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::List(items.into_iter().collect())
    }

    /// Build `(tag operands...)`
    pub fn tagged(tag: &str, operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut items = vec![Expr::symbol(tag)];
        items.extend(operands);
        Expr::List(items)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Head symbol of a list expression, if any
    pub fn tag(&self) -> Option<&str> {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(Expr::as_symbol)
    }

    /// Check whether this is a list headed by `tag`
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }
}

/// Check the variable-name grammar: operator characters, letters,
/// digits and underscores.
pub fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-*/%<>=!_".contains(c))
}

/// Format a number the way Eva prints it: integral values without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", format_number(*n)),
            Expr::Str(s) => f.write_str(&lexer::quote(s)),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Serializes to the array-based AST format: string literals keep their
/// quote delimiters so they stay distinguishable from symbols.
impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expr::Number(n) => serializer.serialize_f64(*n),
            Expr::Str(s) => serializer.serialize_str(&lexer::quote(s)),
            Expr::Symbol(s) => serializer.serialize_str(s),
            Expr::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
