//! Text functions
//!
//! Arguments are converted to their display form first, so `len(123)` is 3.

use super::arg;
use crate::error::{FormulaError, FormulaResult};
use tabula_core::Value;

fn text_of(args: &[Value], index: usize) -> String {
    arg(args, index).to_string()
}

/// Character count argument; defaults to 1 when absent
fn count_of(args: &[Value], index: usize, function: &str) -> FormulaResult<usize> {
    let v = match args.get(index) {
        None => return Ok(1),
        Some(v) => v.to_number(),
    };
    if v.is_nan() || v < 0.0 {
        return Err(FormulaError::Argument(format!(
            "{} expects a non-negative character count, got {}",
            function,
            arg(args, index)
        )));
    }
    Ok(v.trunc() as usize)
}

fn take_left(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn take_right(s: &str, n: usize) -> String {
    let len = s.chars().count();
    if n >= len {
        return s.to_string();
    }
    s.chars().skip(len - n).collect()
}

/// LEN(text)
pub fn fn_len(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(text_of(args, 0).chars().count() as f64))
}

/// UPPER(text)
pub fn fn_upper(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::String(text_of(args, 0).to_uppercase()))
}

/// LOWER(text)
pub fn fn_lower(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::String(text_of(args, 0).to_lowercase()))
}

/// TRIM(text) - strips leading and trailing whitespace
pub fn fn_trim(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::String(text_of(args, 0).trim().to_string()))
}

/// CONCAT(a, b, ...)
pub fn fn_concat(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::String(args.iter().map(Value::to_string).collect()))
}

/// LEFT(text, [num_chars])
pub fn fn_left(args: &[Value]) -> FormulaResult<Value> {
    let n = count_of(args, 1, "LEFT")?;
    Ok(Value::String(take_left(&text_of(args, 0), n)))
}

/// RIGHT(text, [num_chars])
pub fn fn_right(args: &[Value]) -> FormulaResult<Value> {
    let n = count_of(args, 1, "RIGHT")?;
    Ok(Value::String(take_right(&text_of(args, 0), n)))
}

/// CONTAINS(text, search) - case-sensitive substring test
pub fn fn_contains(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Boolean(
        text_of(args, 0).contains(text_of(args, 1).as_str()),
    ))
}
