//! Lexical environments
//!
//! An [`Environment`] is a record of bindings with an optional parent. The
//! same structure backs block scopes, function activations, classes,
//! instances and modules; lookups walk outward through the parent chain.
//! Environments are shared through [`Env`] handles, so a binding changed
//! through one handle is visible to every closure, instance or scope that
//! holds the same environment.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::diagnostics::{EvalResult, RuntimeError};

use super::value::Value;

/// Shared handle to an environment
pub type Env = Rc<Environment>;

type Bindings = IndexMap<String, Value, FxBuildHasher>;

/// Scope record: bindings plus a link to the enclosing scope
pub struct Environment {
    bindings: RefCell<Bindings>,
    parent: Option<Env>,
}

impl Environment {
    /// Create a root environment with no parent
    pub fn new() -> Env {
        Rc::new(Environment {
            bindings: RefCell::new(Bindings::default()),
            parent: None,
        })
    }

    /// Create an empty child of `parent`
    pub fn extend(parent: &Env) -> Env {
        Rc::new(Environment {
            bindings: RefCell::new(Bindings::default()),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Create a root environment pre-populated with `bindings`
    pub fn with_bindings(bindings: impl IntoIterator<Item = (String, Value)>) -> Env {
        let env = Environment::new();
        for (name, value) in bindings {
            env.define(name, value);
        }
        env
    }

    pub fn parent(&self) -> Option<&Env> {
        self.parent.as_ref()
    }

    /// Create or overwrite `name` in this environment only
    pub fn define(&self, name: impl Into<String>, value: Value) -> Value {
        self.bindings.borrow_mut().insert(name.into(), value.clone());
        value
    }

    /// Overwrite `name` in the nearest environment that defines it
    pub fn assign(&self, name: &str, value: Value) -> EvalResult<Value> {
        let owner = self.resolve(name)?;
        owner
            .bindings
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Read `name` from the nearest environment that defines it
    pub fn lookup(&self, name: &str) -> EvalResult<Value> {
        let owner = self.resolve(name)?;
        let bindings = owner.bindings.borrow();
        bindings
            .get(name)
            .cloned()
            .ok_or_else(|| unresolved(name))
    }

    /// Find the nearest environment in the chain that defines `name`
    fn resolve(&self, name: &str) -> EvalResult<&Environment> {
        let mut current = self;
        loop {
            if current.contains_local(name) {
                return Ok(current);
            }
            match &current.parent {
                Some(parent) => current = parent.as_ref(),
                None => return Err(unresolved(name)),
            }
        }
    }

    /// Check if `name` is bound in this frame (not checking parents)
    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Names bound in this frame, in definition order
    pub fn names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }

    /// Number of frames from this one up to the root, inclusive
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |p| p.depth())
    }
}

fn unresolved(name: &str) -> RuntimeError {
    RuntimeError::UnresolvedReference {
        name: name.to_string(),
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bindings only: values can hold environments, and parents are
        // summarized by depth to keep output finite.
        f.debug_struct("Environment")
            .field("names", &self.names())
            .field("depth", &self.depth())
            .finish()
    }
}
