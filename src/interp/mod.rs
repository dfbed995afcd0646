//! Tree-walking interpreter for Eva expressions
//!
//! Evaluates the expression tree directly against a chain of lexical
//! environments. Classes, instances and modules are all environments.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod value;

pub use builtins::Output;
pub use env::{Env, Environment};
pub use eval::Interpreter;
pub use value::{Closure, NativeFn, Value};
