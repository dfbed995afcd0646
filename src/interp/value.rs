//! Runtime values for the interpreter

use std::fmt;
use std::rc::Rc;

use crate::ast::{Expr, format_number};
use crate::diagnostics::EvalResult;

use super::env::Env;

/// Host function signature
pub type NativeFnPtr = dyn Fn(&[Value]) -> EvalResult<Value>;

/// Function provided by the host rather than written in Eva
pub struct NativeFn {
    pub name: String,
    func: Box<NativeFnPtr>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> EvalResult<Value> + 'static,
    ) -> Self {
        NativeFn {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        (self.func)(args)
    }
}

/// User-defined function together with its defining environment
pub struct Closure {
    pub params: Vec<String>,
    pub body: Expr,
    /// Environment active where the `lambda` was evaluated
    pub env: Env,
}

/// Runtime value
#[derive(Clone)]
pub enum Value {
    /// `null`, also the value of missing arguments and loops that never ran
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit float; Eva has a single number type
    Number(f64),
    /// String
    Str(String),
    /// Host function
    Native(Rc<NativeFn>),
    /// Function closure
    Function(Rc<Closure>),
    /// Environment used as a record: class, instance or module
    Env(Env),
}

impl Value {
    pub fn native(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> EvalResult<Value> + 'static,
    ) -> Self {
        Value::Native(Rc::new(NativeFn::new(name, func)))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Native(_) => "native function",
            Value::Function(_) => "function",
            Value::Env(_) => "environment",
        }
    }

    /// Check if value is truthy: `false`, `null`, `0`, `NaN` and the empty
    /// string are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Native(_) | Value::Function(_) | Value::Env(_) => true,
        }
    }

    /// Try to get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn fmt_params(f: &mut fmt::Formatter<'_>, closure: &Closure) -> fmt::Result {
        write!(f, "<fn ({})>", closure.params.join(" "))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Native(native) => write!(f, "<native {}>", native.name),
            Value::Function(closure) => Value::fmt_params(f, closure),
            Value::Env(env) => write!(f, "<env {}>", env.names().join(" ")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Env(env) => {
                write!(f, "{{")?;
                for (i, name) in env.names().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    // Nested records print as their names only, so cyclic
                    // instances (`(set (prop this self) this)`) terminate.
                    match env.lookup(name) {
                        Ok(Value::Env(_)) => write!(f, "{}: {{...}}", name)?,
                        Ok(value) => write!(f, "{}: {:?}", name, value)?,
                        Err(_) => write!(f, "{}: ?", name)?,
                    }
                }
                write!(f, "}}")
            }
            other => write!(f, "{:?}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Env(a), Value::Env(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
