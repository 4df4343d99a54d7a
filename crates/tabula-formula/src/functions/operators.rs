//! Desugared operator functions
//!
//! The parser turns every operator into a call against one of these
//! `__`-prefixed entries.

use super::arg;
use crate::error::FormulaResult;
use std::cmp::Ordering;
use tabula_core::Value;

/// `a + b`: concatenation if either side is a string, numeric sum otherwise
pub fn op_add(args: &[Value]) -> FormulaResult<Value> {
    let (l, r) = (arg(args, 0), arg(args, 1));
    if l.is_string() || r.is_string() {
        return Ok(Value::String(format!("{}{}", l, r)));
    }
    Ok(Value::Number(l.to_number() + r.to_number()))
}

/// `a - b`
pub fn op_sub(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(
        arg(args, 0).to_number() - arg(args, 1).to_number(),
    ))
}

/// `a * b`
pub fn op_mul(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(
        arg(args, 0).to_number() * arg(args, 1).to_number(),
    ))
}

/// `a / b` with IEEE semantics (`1/0` is `Infinity`, `0/0` is `NaN`)
pub fn op_div(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(
        arg(args, 0).to_number() / arg(args, 1).to_number(),
    ))
}

/// `-a`
pub fn op_neg(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(-arg(args, 0).to_number()))
}

/// `a = b` (strict: no coercion between types)
pub fn op_eq(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(arg(args, 0).strict_eq(arg(args, 1))))
}

/// `a != b`
pub fn op_neq(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(!arg(args, 0).strict_eq(arg(args, 1))))
}

fn compare(args: &[Value]) -> Option<Ordering> {
    arg(args, 0).compare(arg(args, 1))
}

/// `a > b`
pub fn op_gt(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(compare(args) == Some(Ordering::Greater)))
}

/// `a >= b`
pub fn op_gte(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(matches!(
        compare(args),
        Some(Ordering::Greater | Ordering::Equal)
    )))
}

/// `a < b`
pub fn op_lt(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(compare(args) == Some(Ordering::Less)))
}

/// `a <= b`
pub fn op_lte(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(matches!(
        compare(args),
        Some(Ordering::Less | Ordering::Equal)
    )))
}

/// `a & b`
pub fn op_and(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(
        arg(args, 0).is_truthy() && arg(args, 1).is_truthy(),
    ))
}

/// `a | b`
pub fn op_or(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(
        arg(args, 0).is_truthy() || arg(args, 1).is_truthy(),
    ))
}

/// `!a`
pub fn op_not(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(!arg(args, 0).is_truthy()))
}
