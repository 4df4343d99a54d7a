//! Variable contexts
//!
//! A [`Context`] maps variable names to values. Evaluation reads through a
//! [`Scope`], which layers a per-call local context over the engine's global
//! context without copying or mutating either.

use crate::value::Value;
use ahash::RandomState;
use std::collections::HashMap;

/// Mapping from variable name to value.
///
/// Names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Context {
    vars: HashMap<String, Value, RandomState>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a variable, returning the previous value if any
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    /// Remove a variable
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Check if a variable is defined
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over all variables (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Context {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Read-only view of a local context layered over a global one.
///
/// Local names shadow global names of the same spelling.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    local: &'a Context,
    global: &'a Context,
}

impl<'a> Scope<'a> {
    /// Create a scope from a local and a global context
    pub fn new(local: &'a Context, global: &'a Context) -> Self {
        Self { local, global }
    }

    /// Look up a variable, local context first
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.local.get(name).or_else(|| self.global.get(name))
    }

    /// Check if a variable is visible in this scope
    pub fn contains(&self, name: &str) -> bool {
        self.local.contains(name) || self.global.contains(name)
    }
}
