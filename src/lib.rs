//! Eva Programming Language Interpreter
//!
//! A small dynamically-typed language written in S-expressions, with:
//! - Lexically-scoped closures and first-class functions
//! - Environment-based classes with single inheritance
//! - File-backed modules loaded through `import`
//! - Syntactic sugar (`def`, `switch`, `for`, `++`, `+=` ...) desugared
//!   into core forms before evaluation
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Parser → Expr → Form::classify → Interpreter
//!                                        ↓
//!                                   Transformer (sugar)
//! ```
//!
//! # Example
//!
//! ```eva
//! (class Point null
//!   (begin
//!     (def constructor (this x y)
//!       (begin
//!         (set (prop this x) x)
//!         (set (prop this y) y)))
//!     (def calc (this)
//!       (+ (prop this x) (prop this y)))))
//!
//! (var p (new Point 10 20))
//! ((prop p calc) p)
//! ```

pub mod ast;
pub mod common;
pub mod diagnostics;
pub mod interp;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod repl;
pub mod transform;

// Re-export diagnostics for convenience
pub use diagnostics::{RuntimeError, SourceFile, SyntaxError};

// Re-exports for convenience
pub use ast::Expr;
pub use interp::{Interpreter, Value};
pub use loader::{FsModuleLoader, MemoryModuleLoader, ModuleLoader};

/// Interpreter version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a program to its `(begin ...)` body
pub fn parse(source: &str) -> miette::Result<Expr> {
    Ok(parser::parse_body(&SourceFile::new("<input>", source))?)
}

/// Interpret a program with a fresh interpreter
pub fn interpret(source: &str) -> miette::Result<Value> {
    let interpreter = Interpreter::new();
    interpreter.eval_source(source)
}
