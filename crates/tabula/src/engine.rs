//! Formula engine
//!
//! [`FormulaEngine`] owns a function registry and a global variable context
//! and ties the lexer, parser, evaluator and dependency collector together.
//!
//! # Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut engine = FormulaEngine::new().with_globals(Context::new().with("rate", 0.5));
//! engine
//!     .register_function("double", |args| Ok(Value::Number(args[0].to_number() * 2.0)))
//!     .unwrap();
//!
//! let local = Context::new().with("price", 10);
//! assert_eq!(
//!     engine.evaluate("double(price) * rate", &local).unwrap(),
//!     Value::Number(10.0)
//! );
//! assert_eq!(
//!     engine.get_dependencies("double(price) * rate").unwrap(),
//!     vec!["price", "rate"]
//! );
//! ```

use crate::{
    collect_variables, evaluate, parse, parse_formula, tokenize, Context, EvaluationContext,
    FormulaExpr, FormulaResult, FunctionDef, FunctionInfo, FunctionRegistry, Scope, Token, Value,
};

/// Options for a formula engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Load the built-in math, text and logical functions (operators are always loaded)
    pub standard_library: bool,
    /// Enforce declared argument counts before calling a function
    pub check_arity: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            standard_library: true,
            check_arity: true,
        }
    }
}

/// Formula engine
///
/// Evaluation only needs `&self`, so a shared engine can evaluate from
/// several threads at once. Registry and global changes need `&mut self`.
#[derive(Debug, Clone)]
pub struct FormulaEngine {
    registry: FunctionRegistry,
    globals: Context,
    options: EngineOptions,
}

impl FormulaEngine {
    /// Create an engine with default options and no globals
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create an engine with custom options
    pub fn with_options(options: EngineOptions) -> Self {
        let registry = if options.standard_library {
            FunctionRegistry::new()
        } else {
            FunctionRegistry::operators_only()
        };

        Self {
            registry,
            globals: Context::new(),
            options,
        }
    }

    /// Replace the global context
    pub fn with_globals(mut self, globals: Context) -> Self {
        self.globals = globals;
        self
    }

    /// Engine options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Global variables, visible to every evaluation unless shadowed locally
    pub fn globals(&self) -> &Context {
        &self.globals
    }

    /// Set a global variable, returning the previous value if any
    pub fn set_global<K: Into<String>, V: Into<Value>>(
        &mut self,
        name: K,
        value: V,
    ) -> Option<Value> {
        self.globals.insert(name, value)
    }

    // === Pipeline stages ===

    /// Split formula text into tokens
    pub fn tokenize(&self, formula: &str) -> FormulaResult<Vec<Token>> {
        tokenize(formula)
    }

    /// Build an expression tree from tokens
    pub fn parse(&self, tokens: &[Token]) -> FormulaResult<FormulaExpr> {
        parse(tokens)
    }

    /// Tokenize and parse formula text
    pub fn parse_formula(&self, formula: &str) -> FormulaResult<FormulaExpr> {
        parse_formula(formula)
    }

    /// Evaluate formula text. `local` shadows the engine's globals.
    pub fn evaluate(&self, formula: &str, local: &Context) -> FormulaResult<Value> {
        let ast = parse_formula(formula)?;
        let result = self.evaluate_expr(&ast, local);
        match &result {
            Ok(value) => log::debug!("evaluated {formula:?} => {value}"),
            Err(e) => log::debug!("evaluating {formula:?} failed: {e}"),
        }
        result
    }

    /// Evaluate an already parsed expression
    pub fn evaluate_expr(&self, expr: &FormulaExpr, local: &Context) -> FormulaResult<Value> {
        let ctx = EvaluationContext::new(Scope::new(local, &self.globals), &self.registry)
            .with_arity_check(self.options.check_arity);
        evaluate(expr, &ctx)
    }

    /// Variable names a formula reads, in first-occurrence order
    pub fn get_dependencies(&self, formula: &str) -> FormulaResult<Vec<String>> {
        Ok(collect_variables(&parse_formula(formula)?))
    }

    /// Variable names an already parsed expression reads
    pub fn dependencies_of(&self, expr: &FormulaExpr) -> Vec<String> {
        collect_variables(expr)
    }

    // === Function registry ===

    /// Register a function accepting any number of arguments
    pub fn register_function<S, F>(
        &mut self,
        name: S,
        implementation: F,
    ) -> FormulaResult<&mut Self>
    where
        S: Into<String>,
        F: Fn(&[Value]) -> FormulaResult<Value> + Send + Sync + 'static,
    {
        self.registry.register_fn(name, implementation)?;
        Ok(self)
    }

    /// Register a function definition, including its declared arity
    pub fn register(&mut self, def: FunctionDef) -> FormulaResult<&mut Self> {
        self.registry.register(def)?;
        Ok(self)
    }

    /// Register `alias` as a snapshot of `target`
    pub fn alias_function(&mut self, alias: &str, target: &str) -> FormulaResult<&mut Self> {
        self.registry.alias(alias, target)?;
        Ok(self)
    }

    /// Remove a user function. Built-ins cannot be removed.
    pub fn unregister_function(&mut self, name: &str) -> FormulaResult<bool> {
        self.registry.unregister(name)
    }

    /// Check if a function is callable by this name
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Sorted function names, excluding internal operator entries
    pub fn list_functions(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Describe a registered function
    pub fn describe_function(&self, name: &str) -> Option<FunctionInfo> {
        self.registry.describe(name)
    }

    /// The underlying function registry
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}
