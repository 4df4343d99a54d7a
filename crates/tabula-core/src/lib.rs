//! # tabula-core
//!
//! Core data structures for the tabula formula engine.
//!
//! This crate provides the types shared by the parser, evaluator and host:
//! - [`Value`] - Formula values (numbers, strings, booleans, null) and their
//!   truthiness/coercion rules
//! - [`Context`] - Variable name → value mapping supplied by the host
//! - [`Scope`] - A local context layered over a global one
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Context, Scope, Value};
//!
//! let globals = Context::new().with("rate", 0.2);
//! let locals = Context::new().with("amount", 150.0);
//! let scope = Scope::new(&locals, &globals);
//!
//! assert_eq!(scope.get("rate"), Some(&Value::Number(0.2)));
//! assert!(Value::string("text").is_truthy());
//! ```

pub mod context;
pub mod value;

// Re-exports for convenience
pub use context::{Context, Scope};
pub use value::{format_number, Value};
