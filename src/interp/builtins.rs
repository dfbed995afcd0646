//! Native functions and constants of the global environment

use std::cell::RefCell;
use std::rc::Rc;

use crate::diagnostics::{EvalResult, RuntimeError};

use super::env::Env;
use super::value::Value;

/// Destination of `print`: stdout when echoing, otherwise a capture buffer
#[derive(Debug, Default)]
pub struct Output {
    lines: Vec<String>,
    /// Write lines to stdout instead of recording them
    echo: bool,
}

impl Output {
    pub fn new(echo: bool) -> Self {
        Output {
            lines: Vec::new(),
            echo,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    fn write_line(&mut self, line: String) {
        if self.echo {
            println!("{}", line);
        } else {
            self.lines.push(line);
        }
    }
}

/// Populate `env` with the built-in bindings
pub fn install(env: &Env, output: Rc<RefCell<Output>>) {
    env.define("null", Value::Null);
    env.define("true", Value::Bool(true));
    env.define("false", Value::Bool(false));
    env.define("VERSION", Value::from(crate::VERSION));

    env.define("+", Value::native("+", add));
    env.define("-", Value::native("-", sub));
    env.define("*", Value::native("*", |args| arithmetic("*", args, |a, b| a * b)));
    env.define("/", Value::native("/", |args| division("/", args, |a, b| a / b)));
    env.define("%", Value::native("%", |args| division("%", args, |a, b| a % b)));

    env.define(">", Value::native(">", |args| compare(">", args, |o| o.is_gt())));
    env.define("<", Value::native("<", |args| compare("<", args, |o| o.is_lt())));
    env.define(">=", Value::native(">=", |args| compare(">=", args, |o| o.is_ge())));
    env.define("<=", Value::native("<=", |args| compare("<=", args, |o| o.is_le())));
    env.define("=", Value::native("=", equals));

    env.define(
        "print",
        Value::native("print", move |args| {
            let line = args
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            output.borrow_mut().write_line(line);
            Ok(Value::Null)
        }),
    );
}

fn arity(name: &str, expected: &str, found: usize) -> RuntimeError {
    RuntimeError::ArityMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        found,
    }
}

fn number(op: &str, value: &Value) -> EvalResult<f64> {
    value
        .as_number()
        .ok_or_else(|| RuntimeError::type_mismatch(format!("`{}`", op), "number", value.type_name()))
}

/// `+`: unary plus, numeric addition or string concatenation
fn add(args: &[Value]) -> EvalResult<Value> {
    match args {
        [value] => Ok(Value::Number(number("+", value)?)),
        [Value::Str(a), Value::Str(b)] => Ok(Value::Str(format!("{}{}", a, b))),
        [a, b] => Ok(Value::Number(number("+", a)? + number("+", b)?)),
        _ => Err(arity("+", "1 or 2", args.len())),
    }
}

/// `-`: negation or subtraction
fn sub(args: &[Value]) -> EvalResult<Value> {
    match args {
        [value] => Ok(Value::Number(-number("-", value)?)),
        [a, b] => Ok(Value::Number(number("-", a)? - number("-", b)?)),
        _ => Err(arity("-", "1 or 2", args.len())),
    }
}

fn arithmetic(op: &str, args: &[Value], apply: fn(f64, f64) -> f64) -> EvalResult<Value> {
    match args {
        [a, b] => Ok(Value::Number(apply(number(op, a)?, number(op, b)?))),
        _ => Err(arity(op, "2", args.len())),
    }
}

/// `/` and `%`: a zero divisor is rejected before the operation runs
fn division(op: &str, args: &[Value], apply: fn(f64, f64) -> f64) -> EvalResult<Value> {
    if let [_, Value::Number(divisor)] = args {
        if *divisor == 0.0 {
            return Err(RuntimeError::DivisionByZero { op: op.to_string() });
        }
    }
    arithmetic(op, args, apply)
}

fn compare(
    op: &str,
    args: &[Value],
    test: fn(std::cmp::Ordering) -> bool,
) -> EvalResult<Value> {
    let ordering = match args {
        [Value::Str(a), Value::Str(b)] => a.cmp(b),
        [a, b] => {
            let (a, b) = (number(op, a)?, number(op, b)?);
            match a.partial_cmp(&b) {
                Some(ordering) => ordering,
                // NaN compares false under every operator
                None => return Ok(Value::Bool(false)),
            }
        }
        _ => return Err(arity(op, "2", args.len())),
    };
    Ok(Value::Bool(test(ordering)))
}

fn equals(args: &[Value]) -> EvalResult<Value> {
    match args {
        [a, b] => Ok(Value::Bool(a == b)),
        _ => Err(arity("=", "2", args.len())),
    }
}
