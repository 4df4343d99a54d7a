//! Logical functions
//!
//! These are eager: every argument is evaluated before the call. The lazy
//! `if`/`iferr` forms live in the evaluator.

use super::arg;
use crate::error::FormulaResult;
use tabula_core::Value;

/// AND(a, b, ...) - TRUE for no arguments
pub fn fn_and(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(args.iter().all(Value::is_truthy)))
}

/// OR(a, b, ...) - FALSE for no arguments
pub fn fn_or(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(args.iter().any(Value::is_truthy)))
}

/// NOT(value)
pub fn fn_not(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(!arg(args, 0).is_truthy()))
}
