//! # tabula
//!
//! An embeddable formula engine for spreadsheet-style expressions.
//!
//! ## Features
//!
//! - Numbers, double-quoted strings, `true`/`false`, variables and function calls
//! - Operators `| & = != > >= < <= + - * /` with the usual precedence, all
//!   left-associative, plus prefix `!` and `-`
//! - Lazy `if(cond, then, else)` and `iferr(value, fallback)`
//! - Case-insensitive functions, case-sensitive variables
//! - Local variables layered over engine-wide globals
//! - Dependency extraction without evaluation
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let engine = FormulaEngine::new().with_globals(Context::new().with("x", 1));
//!
//! assert_eq!(engine.evaluate("2 + 3 * 4", &Context::new()).unwrap(), Value::Number(14.0));
//! assert_eq!(engine.evaluate("x", &Context::new().with("x", 99)).unwrap(), Value::Number(99.0));
//! assert_eq!(
//!     engine.evaluate("iferr(missing, 42)", &Context::new()).unwrap(),
//!     Value::Number(42.0)
//! );
//! ```

pub mod engine;
pub mod prelude;

// Re-export engine types
pub use engine::{EngineOptions, FormulaEngine};

// Re-export core types
pub use tabula_core::{format_number, Context, Scope, Value};

// Re-export formula types
pub use tabula_formula::{
    collect_variables, evaluate, formula_dependencies, parse, parse_formula, tokenize,
    BinaryOperator, ErrorKind, EvaluationContext, FormulaError, FormulaExpr, FormulaResult,
    FunctionDef, FunctionImpl, FunctionInfo, FunctionRegistry, Token, TokenKind, UnaryOperator,
};
