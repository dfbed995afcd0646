//! Tree-walking evaluator for Eva expressions

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::{Expr, Form, SetTarget};
use crate::diagnostics::{EvalResult, RuntimeError, SourceFile};
use crate::loader::{FsModuleLoader, ModuleLoader};
use crate::parser;
use crate::transform::Transformer;

use super::builtins::{self, Output};
use super::env::{Env, Environment};
use super::value::{Closure, Value};

/// Tree-walking interpreter
pub struct Interpreter {
    /// Root environment holding the builtins and top-level definitions
    global: Env,
    transformer: Transformer,
    loader: Box<dyn ModuleLoader>,
    /// Lines written by `print`
    output: Rc<RefCell<Output>>,
}

impl Interpreter {
    /// Create an interpreter that imports modules from `./modules`
    pub fn new() -> Self {
        Self::with_loader(FsModuleLoader::default())
    }

    /// Create an interpreter that imports modules through `loader`
    pub fn with_loader(loader: impl ModuleLoader + 'static) -> Self {
        let output = Rc::new(RefCell::new(Output::new(true)));
        Interpreter {
            global: Self::fresh_global(&output),
            transformer: Transformer::new(),
            loader: Box::new(loader),
            output,
        }
    }

    fn fresh_global(output: &Rc<RefCell<Output>>) -> Env {
        let global = Environment::new();
        builtins::install(&global, Rc::clone(output));
        global
    }

    /// The global environment
    pub fn global(&self) -> &Env {
        &self.global
    }

    /// Drop every top-level definition and start over with the builtins.
    ///
    /// Closures defined at top level hold the old global scope through an
    /// `Rc` cycle, so that scope stays allocated after a reset.
    pub fn reset(&mut self) {
        self.global = Self::fresh_global(&self.output);
    }

    /// Lines printed while echo was off
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().lines().to_vec()
    }

    /// Clear output buffer
    pub fn clear_output(&mut self) {
        self.output.borrow_mut().clear();
    }

    /// Whether `print` writes to stdout (`true`) or to the capture buffer
    pub fn set_echo(&mut self, echo: bool) {
        self.output.borrow_mut().set_echo(echo);
    }

    /// Evaluate `expr` in the global environment
    pub fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        self.evaluate(expr, &self.global)
    }

    /// Evaluate body-shaped input directly in the global environment: the
    /// expressions of a `begin` run in the global scope itself.
    pub fn evaluate_top_level(&self, expr: &Expr) -> EvalResult<Value> {
        self.eval_body(expr, &self.global)
    }

    /// Parse `source` as a program and evaluate it at top level
    pub fn eval_source(&self, source: &str) -> miette::Result<Value> {
        self.eval_file(&SourceFile::new("<input>", source))
    }

    /// Parse a source file as a program and evaluate it at top level
    pub fn eval_file(&self, file: &SourceFile) -> miette::Result<Value> {
        let body = parser::parse_body(file)?;
        Ok(self.evaluate_top_level(&body)?)
    }

    /// Evaluate an expression in `env`
    pub fn evaluate(&self, expr: &Expr, env: &Env) -> EvalResult<Value> {
        trace!(%expr, "evaluate");

        match Form::classify(expr)? {
            Form::Number(n) => Ok(Value::Number(n)),

            Form::Str(s) => Ok(Value::Str(s.to_string())),

            Form::Variable(name) => env.lookup(name),

            Form::Begin(exprs) => {
                let block = Environment::extend(env);
                self.eval_sequence(exprs, &block)
            }

            Form::Var { name, value } => {
                let value = self.evaluate(value, env)?;
                Ok(env.define(name, value))
            }

            Form::Set { target, value } => match target {
                SetTarget::Name(name) => {
                    let value = self.evaluate(value, env)?;
                    env.assign(name, value)
                }
                // Defined on the instance itself, shadowing any class member
                SetTarget::Prop { instance, name } => {
                    let record = self.eval_record("set", instance, env)?;
                    let value = self.evaluate(value, env)?;
                    Ok(record.define(name, value))
                }
            },

            Form::If {
                condition,
                consequent,
                alternate,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.evaluate(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.evaluate(alternate, env)
                } else {
                    Ok(Value::Null)
                }
            }

            Form::While { condition, body } => {
                let mut result = Value::Null;
                while self.evaluate(condition, env)?.is_truthy() {
                    result = self.evaluate(body, env)?;
                }
                Ok(result)
            }

            Form::Lambda { params, body } => Ok(Value::Function(Rc::new(Closure {
                params: params.into_iter().map(String::from).collect(),
                body: body.clone(),
                env: Rc::clone(env),
            }))),

            Form::Class { name, parent, body } => {
                let parent_env = match parent {
                    None => Rc::clone(env),
                    Some(parent) => match self.evaluate(parent, env)? {
                        Value::Null => Rc::clone(env),
                        Value::Env(parent_env) => parent_env,
                        other => {
                            return Err(RuntimeError::type_mismatch(
                                format!("parent of class `{}`", name),
                                "class or null",
                                other.type_name(),
                            ));
                        }
                    },
                };
                let class_env = Environment::extend(&parent_env);
                self.eval_body(body, &class_env)?;
                debug!("Defined class {} with members {:?}", name, class_env.names());
                Ok(env.define(name, Value::Env(class_env)))
            }

            Form::Super { class } => {
                let class_env = self.eval_record("super", class, env)?;
                Ok(class_env
                    .parent()
                    .map_or(Value::Null, |parent| Value::Env(Rc::clone(parent))))
            }

            Form::New { class, args } => {
                let class_env = self.eval_record("new", class, env)?;
                let instance = Environment::extend(&class_env);

                let mut values = Vec::with_capacity(args.len() + 1);
                values.push(Value::Env(Rc::clone(&instance)));
                for arg in args {
                    values.push(self.evaluate(arg, env)?);
                }

                let constructor = class_env.lookup("constructor")?;
                self.call(&constructor, values)?;
                Ok(Value::Env(instance))
            }

            Form::Prop { instance, name } => self.eval_record("prop", instance, env)?.lookup(name),

            Form::Module { name, body } => {
                let module_env = Environment::extend(env);
                self.eval_body(body, &module_env)?;
                debug!("Defined module {} exporting {:?}", name, module_env.names());
                Ok(env.define(name, Value::Env(module_env)))
            }

            Form::Import { name } => self.import(name),

            Form::Sugar(sugar) => {
                let expansion = self.transformer.desugar(sugar, expr)?;
                self.evaluate(&expansion, env)
            }

            Form::Apply { callee, args } => {
                let callee = self.evaluate(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg, env))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call(&callee, args)
            }
        }
    }

    /// Invoke a callable value with already-evaluated arguments
    pub fn call(&self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Native(native) => native.call(&args),
            Value::Function(closure) => self.call_closure(closure, args),
            other => Err(RuntimeError::NotCallable {
                value: format!("{:?}", other),
                type_name: other.type_name(),
            }),
        }
    }

    /// Call protocol: the activation scope extends the closure's defining
    /// environment, never the caller's.
    fn call_closure(&self, closure: &Closure, args: Vec<Value>) -> EvalResult<Value> {
        let activation = Environment::extend(&closure.env);
        let mut args = args.into_iter();
        for param in &closure.params {
            activation.define(param, args.next().unwrap_or(Value::Null));
        }
        // A `begin` body opens its own block on top of the activation scope
        self.evaluate(&closure.body, &activation)
    }

    /// Evaluate a declaration body in `env` without opening a block scope
    fn eval_body(&self, body: &Expr, env: &Env) -> EvalResult<Value> {
        match body.as_list() {
            Some([head, exprs @ ..]) if head.as_symbol() == Some("begin") => {
                self.eval_sequence(exprs, env)
            }
            _ => self.evaluate(body, env),
        }
    }

    fn eval_sequence(&self, exprs: &[Expr], env: &Env) -> EvalResult<Value> {
        let Some((last, init)) = exprs.split_last() else {
            return Err(RuntimeError::EmptyBlock);
        };
        for expr in init {
            self.evaluate(expr, env)?;
        }
        self.evaluate(last, env)
    }

    /// Evaluate `expr` to an environment record
    fn eval_record(&self, form: &str, expr: &Expr, env: &Env) -> EvalResult<Env> {
        match self.evaluate(expr, env)? {
            Value::Env(record) => Ok(record),
            other => Err(RuntimeError::type_mismatch(
                format!("`{}` on `{}`", form, expr),
                "class, instance or module",
                other.type_name(),
            )),
        }
    }

    /// Load, parse and evaluate a module in the global environment
    fn import(&self, name: &str) -> EvalResult<Value> {
        debug!("Importing module {}", name);
        let file = self.loader.load(name)?;
        let body = parser::parse_body(&file).map_err(|error| RuntimeError::ModuleSyntax {
            name: name.to_string(),
            error,
        })?;
        let module = Expr::tagged("module", [Expr::symbol(name), body]);
        self.evaluate(&module, &self.global)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
