//! Function registry and built-in functions
//!
//! The evaluator resolves every non-special call through a
//! [`FunctionRegistry`]. Desugared operators (`__add`, `__eq`, ...) are
//! ordinary entries, so a host can intercept them like any other function.

pub mod logical;
pub mod math;
pub mod operators;
pub mod text;

use crate::error::{FormulaError, FormulaResult};
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;
use tabula_core::Value;

/// Function implementation signature
///
/// Receives the already-evaluated arguments in call order.
pub type FunctionImpl = Arc<dyn Fn(&[Value]) -> FormulaResult<Value> + Send + Sync>;

/// Signature of the built-in function bodies
pub type BuiltinFn = fn(&[Value]) -> FormulaResult<Value>;

/// Prefix reserved for desugared operator entries
pub const OPERATOR_PREFIX: &str = "__";

/// Call names handled lazily by the evaluator before any registry lookup
pub const SPECIAL_FORMS: [&str; 2] = ["if", "iferr"];

/// Function definition
#[derive(Clone)]
pub struct FunctionDef {
    /// Function name (lower-case once registered)
    pub name: String,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
    builtin: bool,
}

impl FunctionDef {
    /// Create a definition accepting any number of arguments
    pub fn new<S, F>(name: S, implementation: F) -> Self
    where
        S: Into<String>,
        F: Fn(&[Value]) -> FormulaResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            min_args: 0,
            max_args: None,
            implementation: Arc::new(implementation),
            builtin: false,
        }
    }

    /// Declare the accepted argument count
    pub fn with_arity(mut self, min_args: usize, max_args: Option<usize>) -> Self {
        self.min_args = min_args;
        self.max_args = max_args;
        self
    }

    /// Whether this entry ships with the registry and cannot be removed
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Invoke the implementation
    pub fn call(&self, args: &[Value]) -> FormulaResult<Value> {
        (self.implementation)(args)
    }

    /// Check an argument count against the declared arity
    pub fn check_arity(&self, actual: usize) -> FormulaResult<()> {
        if actual < self.min_args {
            return Err(FormulaError::ArgumentCount {
                function: self.name.clone(),
                expected: format!("at least {}", self.min_args),
                actual,
            });
        }

        if let Some(max) = self.max_args {
            if actual > max {
                return Err(FormulaError::ArgumentCount {
                    function: self.name.clone(),
                    expected: format!("at most {}", max),
                    actual,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("builtin", &self.builtin)
            .finish_non_exhaustive()
    }
}

/// Public description of a registered function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub min_args: usize,
    pub max_args: Option<usize>,
    pub builtin: bool,
}

/// Function registry
///
/// Names are case-insensitive. The backing map is private; all mutation
/// goes through [`register`](Self::register), [`alias`](Self::alias) and
/// [`unregister`](Self::unregister).
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with operators and all built-in functions
    pub fn new() -> Self {
        let mut registry = Self::operators_only();

        registry.register_math_functions();
        registry.register_text_functions();
        registry.register_logical_functions();

        registry
    }

    /// Create a registry holding only the desugared operator entries
    pub fn operators_only() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };
        registry.register_operator_functions();
        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Register a function, replacing any existing entry of the same name.
    ///
    /// Replacing a built-in keeps it marked as built-in.
    pub fn register(&mut self, mut def: FunctionDef) -> FormulaResult<&mut Self> {
        if def.name.trim().is_empty() {
            return Err(FormulaError::InvalidFunctionName);
        }

        let key = def.name.to_lowercase();
        if SPECIAL_FORMS.contains(&key.as_str()) {
            log::warn!("function \"{key}\" is shadowed by the evaluator's special form");
        }

        match self.functions.get(&key) {
            Some(existing) => {
                log::debug!("overriding function \"{key}\"");
                def.builtin = existing.builtin;
            }
            None => log::debug!("registering function \"{key}\""),
        }

        def.name = key.clone();
        self.functions.insert(key, def);
        Ok(self)
    }

    /// Register a closure accepting any number of arguments
    pub fn register_fn<S, F>(&mut self, name: S, implementation: F) -> FormulaResult<&mut Self>
    where
        S: Into<String>,
        F: Fn(&[Value]) -> FormulaResult<Value> + Send + Sync + 'static,
    {
        self.register(FunctionDef::new(name, implementation))
    }

    /// Register `alias` as a copy of `target` taken now.
    ///
    /// Later changes to `target` do not affect the alias.
    pub fn alias(&mut self, alias: &str, target: &str) -> FormulaResult<&mut Self> {
        let def = self.get(target).ok_or(FormulaError::NotAFunction)?.clone();
        self.register(FunctionDef {
            name: alias.to_string(),
            builtin: false,
            ..def
        })
    }

    /// Remove a function.
    ///
    /// Returns `Ok(false)` if no such function exists.
    pub fn unregister(&mut self, name: &str) -> FormulaResult<bool> {
        let key = name.to_lowercase();
        match self.functions.get(&key) {
            None => Ok(false),
            Some(def) if def.builtin => Err(FormulaError::BuiltinFunction(key)),
            Some(_) => {
                self.functions.remove(&key);
                log::debug!("unregistered function \"{key}\"");
                Ok(true)
            }
        }
    }

    /// Sorted names of all callable functions, excluding operator entries
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .functions
            .keys()
            .filter(|name| !name.starts_with(OPERATOR_PREFIX))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Describe a registered function
    pub fn describe(&self, name: &str) -> Option<FunctionInfo> {
        self.get(name).map(|def| FunctionInfo {
            name: def.name.clone(),
            min_args: def.min_args,
            max_args: def.max_args,
            builtin: def.builtin,
        })
    }

    /// Number of registered entries, operators included
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_builtin(
        &mut self,
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        implementation: BuiltinFn,
    ) {
        self.functions.insert(
            name.to_string(),
            FunctionDef {
                name: name.to_string(),
                min_args,
                max_args,
                implementation: Arc::new(implementation),
                builtin: true,
            },
        );
    }

    fn register_operator_functions(&mut self) {
        self.register_builtin("__add", 2, Some(2), operators::op_add);
        self.register_builtin("__sub", 2, Some(2), operators::op_sub);
        self.register_builtin("__mul", 2, Some(2), operators::op_mul);
        self.register_builtin("__div", 2, Some(2), operators::op_div);
        self.register_builtin("__neg", 1, Some(1), operators::op_neg);
        self.register_builtin("__eq", 2, Some(2), operators::op_eq);
        self.register_builtin("__neq", 2, Some(2), operators::op_neq);
        self.register_builtin("__gt", 2, Some(2), operators::op_gt);
        self.register_builtin("__gte", 2, Some(2), operators::op_gte);
        self.register_builtin("__lt", 2, Some(2), operators::op_lt);
        self.register_builtin("__lte", 2, Some(2), operators::op_lte);
        self.register_builtin("__and", 2, Some(2), operators::op_and);
        self.register_builtin("__or", 2, Some(2), operators::op_or);
        self.register_builtin("__not", 1, Some(1), operators::op_not);
    }

    fn register_math_functions(&mut self) {
        self.register_builtin("sum", 0, None, math::fn_sum);
        self.register_builtin("mean", 0, None, math::fn_mean);
        self.register_builtin("min", 0, None, math::fn_min);
        self.register_builtin("max", 0, None, math::fn_max);
        self.register_builtin("abs", 1, Some(1), math::fn_abs);
        self.register_builtin("round", 1, Some(2), math::fn_round);
        self.register_builtin("floor", 1, Some(1), math::fn_floor);
        self.register_builtin("ceil", 1, Some(1), math::fn_ceil);
        self.register_builtin("sqrt", 1, Some(1), math::fn_sqrt);
        self.register_builtin("pow", 2, Some(2), math::fn_pow);
        self.register_builtin("mod", 2, Some(2), math::fn_mod);

        // avg is a snapshot of mean, not a live reference to it
        if let Some(mean) = self.functions.get("mean").cloned() {
            self.functions.insert(
                "avg".to_string(),
                FunctionDef {
                    name: "avg".to_string(),
                    ..mean
                },
            );
        }
    }

    fn register_text_functions(&mut self) {
        self.register_builtin("len", 1, Some(1), text::fn_len);
        self.register_builtin("upper", 1, Some(1), text::fn_upper);
        self.register_builtin("lower", 1, Some(1), text::fn_lower);
        self.register_builtin("trim", 1, Some(1), text::fn_trim);
        self.register_builtin("concat", 0, None, text::fn_concat);
        self.register_builtin("left", 1, Some(2), text::fn_left);
        self.register_builtin("right", 1, Some(2), text::fn_right);
        self.register_builtin("contains", 2, Some(2), text::fn_contains);
    }

    fn register_logical_functions(&mut self) {
        self.register_builtin("and", 0, None, logical::fn_and);
        self.register_builtin("or", 0, None, logical::fn_or);
        self.register_builtin("not", 1, Some(1), logical::fn_not);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.list())
            .finish()
    }
}

/// Argument at `index`, or `Null` when absent
pub(crate) fn arg(args: &[Value], index: usize) -> &Value {
    static NULL: Value = Value::Null;
    args.get(index).unwrap_or(&NULL)
}
