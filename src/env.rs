// ABOUTME: Environment: identifier-to-value bindings with a parent lookup chain

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in THIS scope (doesn't walk the parent chain).
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Looks up a symbol in this scope and parent scopes recursively.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }
        None
    }

    /// Writes to the nearest scope in the parent chain where `name` is already
    /// bound. Unlike `define`, this does not create a new binding.
    pub fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        if let Some(ref parent) = self.parent {
            return parent.set(name, value);
        }
        Err(EvalError::UndefinedSymbol(name.to_string()))
    }

    /// Convenience for binding `__moddir__` on a freshly created module or
    /// root environment (§3 Invariants).
    pub fn set_moddir(&self, dir: impl Into<String>) {
        self.define("__moddir__", Value::string(dir.into()));
    }

    pub fn moddir(&self) -> String {
        match self.get("__moddir__") {
            Some(Value::String(s)) => s.to_string(),
            _ => ".".to_string(),
        }
    }

    /// The structural parent of this environment, i.e. the "class
    /// environment's parent" referenced by §4.4.4 object construction.
    pub fn parent(&self) -> Option<Rc<Environment>> {
        self.parent.clone()
    }

    /// A fresh environment sharing this environment's parent (a sibling
    /// scope), used when an object's environment should see what the class
    /// environment's parent sees but not the class environment itself.
    pub fn sibling(&self) -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: self.parent.clone(),
        })
    }

    /// Snapshot of bindings defined directly in this scope (not the parent
    /// chain), used for class attribute copy-down (§4.5 `class(parents...)`).
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        self.bindings
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
