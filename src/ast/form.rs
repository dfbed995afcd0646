//! Typed view of Eva expressions
//!
//! [`Form::classify`] maps an [`Expr`] onto the closed set of evaluation
//! rules, checking the operand shape of each special form on the way. The
//! evaluator then dispatches with an exhaustive `match`.

use crate::diagnostics::{EvalResult, RuntimeError};

use super::{Expr, is_variable_name};

/// Syntactic sugar handled by the transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sugar {
    /// `(def name (params) body)`
    Def,
    /// `(switch (cond block)... (else block))`
    Switch,
    /// `(for init cond step body)`
    For,
    /// `(++ x)`
    Inc,
    /// `(-- x)`
    Dec,
    /// `(+= x v)`
    IncBy,
    /// `(-= x v)`
    DecBy,
}

impl Sugar {
    pub fn from_tag(tag: &str) -> Option<Sugar> {
        match tag {
            "def" => Some(Sugar::Def),
            "switch" => Some(Sugar::Switch),
            "for" => Some(Sugar::For),
            "++" => Some(Sugar::Inc),
            "--" => Some(Sugar::Dec),
            "+=" => Some(Sugar::IncBy),
            "-=" => Some(Sugar::DecBy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sugar::Def => "def",
            Sugar::Switch => "switch",
            Sugar::For => "for",
            Sugar::Inc => "++",
            Sugar::Dec => "--",
            Sugar::IncBy => "+=",
            Sugar::DecBy => "-=",
        }
    }
}

/// Left-hand side of a `set`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetTarget<'a> {
    /// Plain variable, assigned through the scope chain
    Name(&'a str),
    /// `(prop instance name)`, defined directly on the instance
    Prop { instance: &'a Expr, name: &'a str },
}

/// Evaluation rule for an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Form<'a> {
    Number(f64),
    Str(&'a str),
    Variable(&'a str),
    Begin(&'a [Expr]),
    Var {
        name: &'a str,
        value: &'a Expr,
    },
    Set {
        target: SetTarget<'a>,
        value: &'a Expr,
    },
    If {
        condition: &'a Expr,
        consequent: &'a Expr,
        alternate: Option<&'a Expr>,
    },
    While {
        condition: &'a Expr,
        body: &'a Expr,
    },
    Lambda {
        params: Vec<&'a str>,
        body: &'a Expr,
    },
    Class {
        name: &'a str,
        parent: Option<&'a Expr>,
        body: &'a Expr,
    },
    Super {
        class: &'a Expr,
    },
    New {
        class: &'a Expr,
        args: &'a [Expr],
    },
    Prop {
        instance: &'a Expr,
        name: &'a str,
    },
    Module {
        name: &'a str,
        body: &'a Expr,
    },
    Import {
        name: &'a str,
    },
    Sugar(Sugar),
    Apply {
        callee: &'a Expr,
        args: &'a [Expr],
    },
}

impl<'a> Form<'a> {
    /// Classify an expression, validating special-form shapes
    pub fn classify(expr: &'a Expr) -> EvalResult<Form<'a>> {
        let items = match expr {
            Expr::Number(n) => return Ok(Form::Number(*n)),
            Expr::Str(s) => return Ok(Form::Str(s)),
            Expr::Symbol(name) if is_variable_name(name) => return Ok(Form::Variable(name)),
            Expr::Symbol(_) => return Err(unimplemented(expr)),
            Expr::List(items) => items,
        };

        let Some((head, operands)) = items.split_first() else {
            return Err(unimplemented(expr));
        };

        let Some(tag) = head.as_symbol() else {
            return Ok(Form::Apply {
                callee: head,
                args: operands,
            });
        };

        if let Some(sugar) = Sugar::from_tag(tag) {
            return Ok(Form::Sugar(sugar));
        }

        let form = match tag {
            "begin" => Form::Begin(operands),
            "var" => {
                expect_operands(tag, operands, 2)?;
                Form::Var {
                    name: name_operand(tag, &operands[0])?,
                    value: &operands[1],
                }
            }
            "set" => {
                expect_operands(tag, operands, 2)?;
                Form::Set {
                    target: set_target(&operands[0])?,
                    value: &operands[1],
                }
            }
            "if" => match operands {
                [condition, consequent] => Form::If {
                    condition,
                    consequent,
                    alternate: None,
                },
                [condition, consequent, alternate] => Form::If {
                    condition,
                    consequent,
                    alternate: Some(alternate),
                },
                _ => {
                    return Err(malformed(
                        tag,
                        "expected a condition, a consequent and an optional alternate",
                    ));
                }
            },
            "while" => {
                expect_operands(tag, operands, 2)?;
                Form::While {
                    condition: &operands[0],
                    body: &operands[1],
                }
            }
            "lambda" => {
                expect_operands(tag, operands, 2)?;
                Form::Lambda {
                    params: param_list(tag, &operands[0])?,
                    body: &operands[1],
                }
            }
            "class" => match operands {
                [name, body] => Form::Class {
                    name: name_operand(tag, name)?,
                    parent: None,
                    body,
                },
                [name, parent, body] => Form::Class {
                    name: name_operand(tag, name)?,
                    parent: Some(parent),
                    body,
                },
                _ => {
                    return Err(malformed(
                        tag,
                        "expected a name, an optional parent and a body",
                    ));
                }
            },
            "super" => {
                expect_operands(tag, operands, 1)?;
                Form::Super {
                    class: &operands[0],
                }
            }
            "new" => match operands.split_first() {
                Some((class, args)) => Form::New { class, args },
                None => return Err(malformed(tag, "expected a class expression")),
            },
            "prop" => {
                expect_operands(tag, operands, 2)?;
                Form::Prop {
                    instance: &operands[0],
                    name: name_operand(tag, &operands[1])?,
                }
            }
            "module" => {
                expect_operands(tag, operands, 2)?;
                Form::Module {
                    name: name_operand(tag, &operands[0])?,
                    body: &operands[1],
                }
            }
            "import" => {
                expect_operands(tag, operands, 1)?;
                Form::Import {
                    name: name_operand(tag, &operands[0])?,
                }
            }
            _ => Form::Apply {
                callee: head,
                args: operands,
            },
        };

        Ok(form)
    }
}

fn unimplemented(expr: &Expr) -> RuntimeError {
    RuntimeError::UnimplementedForm {
        expr: expr.to_string(),
    }
}

pub(crate) fn malformed(form: &str, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::MalformedForm {
        form: form.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn operand_count(tag: &str, expected: usize, found: usize) -> RuntimeError {
    malformed(
        tag,
        format!("expected {} operand(s), found {}", expected, found),
    )
}

pub(crate) fn expect_operands(tag: &str, operands: &[Expr], count: usize) -> EvalResult<()> {
    if operands.len() == count {
        Ok(())
    } else {
        Err(operand_count(tag, count, operands.len()))
    }
}

pub(crate) fn name_operand<'a>(tag: &str, expr: &'a Expr) -> EvalResult<&'a str> {
    match expr {
        Expr::Symbol(name) if is_variable_name(name) => Ok(name),
        other => Err(malformed(tag, format!("expected a name, found `{}`", other))),
    }
}

fn set_target(expr: &Expr) -> EvalResult<SetTarget<'_>> {
    if expr.is_tagged("prop") {
        if let Form::Prop { instance, name } = Form::classify(expr)? {
            return Ok(SetTarget::Prop { instance, name });
        }
    }
    Ok(SetTarget::Name(name_operand("set", expr)?))
}

fn param_list<'a>(tag: &str, expr: &'a Expr) -> EvalResult<Vec<&'a str>> {
    let Some(items) = expr.as_list() else {
        return Err(malformed(
            tag,
            format!("expected a parameter list, found `{}`", expr),
        ));
    };
    items.iter().map(|param| name_operand(tag, param)).collect()
}
