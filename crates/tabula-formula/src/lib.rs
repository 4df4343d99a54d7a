//! # tabula-formula
//!
//! Formula lexer, parser and evaluator for tabula.
//!
//! This crate provides:
//! - Tokenizing (text → tokens)
//! - Formula parsing (tokens → AST), with operators desugared into calls
//! - Formula evaluation (AST → value) with lazy `if`/`iferr`
//! - A case-insensitive function registry with the built-in library
//! - Dependency collection (AST → variable names)
//!
//! ## Example
//!
//! ```rust
//! use tabula_formula::{
//!     evaluate, parse_formula, Context, EvaluationContext, FunctionRegistry, Scope, Value,
//! };
//!
//! let ast = parse_formula("sum(x, 2) * 3").unwrap();
//! let registry = FunctionRegistry::new();
//! let vars = Context::new().with("x", 1);
//! let globals = Context::new();
//! let ctx = EvaluationContext::new(Scope::new(&vars, &globals), &registry);
//!
//! assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(9.0));
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use dependency::{collect_variables, formula_dependencies};
pub use error::{ErrorKind, FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext};
pub use functions::{FunctionDef, FunctionImpl, FunctionInfo, FunctionRegistry};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, parse_formula};

pub use tabula_core::{Context, Scope, Value};
