//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Core types
    Context,
    // Engine types
    EngineOptions,
    // Error types
    ErrorKind,
    FormulaEngine,
    FormulaError,
    // AST
    FormulaExpr,
    FormulaResult,
    // Functions
    FunctionDef,
    FunctionInfo,
    Value,
};
