//! Math functions

use super::arg;
use crate::error::FormulaResult;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tabula_core::Value;

fn numbers(args: &[Value]) -> impl Iterator<Item = f64> + '_ {
    args.iter().map(Value::to_number)
}

/// Smallest magnitude at which an f64 has no fractional part
const MAX_FRACTIONAL: f64 = 4_503_599_627_370_496.0;

/// SUM(a, b, ...)
pub fn fn_sum(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(numbers(args).sum()))
}

/// MEAN(a, b, ...) - NaN for no arguments
pub fn fn_mean(args: &[Value]) -> FormulaResult<Value> {
    if args.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    let sum: f64 = numbers(args).sum();
    Ok(Value::Number(sum / args.len() as f64))
}

/// MIN(a, b, ...) - Infinity for no arguments, NaN if any argument is NaN
pub fn fn_min(args: &[Value]) -> FormulaResult<Value> {
    let mut min = f64::INFINITY;
    for n in numbers(args) {
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        min = min.min(n);
    }
    Ok(Value::Number(min))
}

/// MAX(a, b, ...) - -Infinity for no arguments, NaN if any argument is NaN
pub fn fn_max(args: &[Value]) -> FormulaResult<Value> {
    let mut max = f64::NEG_INFINITY;
    for n in numbers(args) {
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        max = max.max(n);
    }
    Ok(Value::Number(max))
}

/// ABS(number)
pub fn fn_abs(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(arg(args, 0).to_number().abs()))
}

/// ROUND(number, [num_digits]) - Rounds half away from zero.
///
/// Positive digits round through a decimal representation so that values
/// like 1.005 round the way they read.
pub fn fn_round(args: &[Value]) -> FormulaResult<Value> {
    let number = arg(args, 0).to_number();
    let digits = arg(args, 1).to_number();

    if !number.is_finite() || digits.is_nan() {
        return Ok(Value::Number(if digits.is_nan() { f64::NAN } else { number }));
    }

    let digits = digits.trunc().clamp(-308.0, 28.0) as i32;

    if digits >= 0 {
        let rounded = number
            .to_string()
            .parse::<Decimal>()
            .ok()
            .and_then(|d| {
                d.round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointAwayFromZero)
                    .to_f64()
            });
        if let Some(result) = rounded {
            return Ok(Value::Number(result));
        }
        // Too large for a decimal; from 2^52 up every f64 is already integral
        if number.abs() >= MAX_FRACTIONAL {
            return Ok(Value::Number(number));
        }
    }

    // Negative digits round to the left of the decimal point
    let multiplier = 10_f64.powi(digits);
    if !(number * multiplier).is_finite() {
        return Ok(Value::Number(number));
    }
    let result = if number >= 0.0 {
        (number * multiplier + 0.5).floor() / multiplier
    } else {
        (number * multiplier - 0.5).ceil() / multiplier
    };

    Ok(Value::Number(result))
}

/// FLOOR(number)
pub fn fn_floor(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(arg(args, 0).to_number().floor()))
}

/// CEIL(number)
pub fn fn_ceil(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(arg(args, 0).to_number().ceil()))
}

/// SQRT(number) - NaN for negative input
pub fn fn_sqrt(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(arg(args, 0).to_number().sqrt()))
}

/// POW(base, exponent)
pub fn fn_pow(args: &[Value]) -> FormulaResult<Value> {
    Ok(Value::Number(
        arg(args, 0).to_number().powf(arg(args, 1).to_number()),
    ))
}

/// MOD(number, divisor) - The result has the same sign as the divisor.
/// NaN when the divisor is zero.
pub fn fn_mod(args: &[Value]) -> FormulaResult<Value> {
    let number = arg(args, 0).to_number();
    let divisor = arg(args, 1).to_number();

    if divisor == 0.0 {
        return Ok(Value::Number(f64::NAN));
    }

    Ok(Value::Number(number - divisor * (number / divisor).floor()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn num_of(v: Value) -> f64 {
        match v {
            Value::Number(n) => n,
            other => panic!("Expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_and_mean() {
        assert_eq!(fn_sum(&[n(1.0), n(2.0), n(3.0)]).unwrap(), n(6.0));
        assert_eq!(fn_sum(&[]).unwrap(), n(0.0));
        assert_eq!(fn_sum(&[n(1.0), Value::string("2")]).unwrap(), n(3.0));
        assert_eq!(fn_mean(&[n(2.0), n(4.0), n(6.0)]).unwrap(), n(4.0));
        assert!(num_of(fn_mean(&[]).unwrap()).is_nan());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(fn_min(&[n(5.0), n(2.0), n(8.0)]).unwrap(), n(2.0));
        assert_eq!(fn_max(&[n(5.0), n(2.0), n(8.0)]).unwrap(), n(8.0));
        assert_eq!(fn_min(&[]).unwrap(), n(f64::INFINITY));
        assert_eq!(fn_max(&[]).unwrap(), n(f64::NEG_INFINITY));
        assert!(num_of(fn_max(&[n(1.0), Value::string("x")]).unwrap()).is_nan());
    }

    #[test]
    fn test_round() {
        assert_eq!(fn_round(&[n(2.5)]).unwrap(), n(3.0));
        assert_eq!(fn_round(&[n(-2.5)]).unwrap(), n(-3.0));
        assert_eq!(fn_round(&[n(2.4)]).unwrap(), n(2.0));
        assert_eq!(fn_round(&[n(1.005), n(2.0)]).unwrap(), n(1.01));
        assert_eq!(fn_round(&[n(3.14159), n(3.0)]).unwrap(), n(3.142));
        assert_eq!(fn_round(&[n(1234.5), n(-2.0)]).unwrap(), n(1200.0));
        assert_eq!(fn_round(&[n(f64::INFINITY)]).unwrap(), n(f64::INFINITY));
    }

    #[test]
    fn test_round_large_magnitude() {
        assert_eq!(fn_round(&[n(1e300), n(10.0)]).unwrap(), n(1e300));
        assert_eq!(fn_round(&[n(-1e300), n(28.0)]).unwrap(), n(-1e300));
        assert_eq!(fn_round(&[n(1e300)]).unwrap(), n(1e300));
    }

    #[test]
    fn test_mod() {
        assert_eq!(fn_mod(&[n(7.0), n(3.0)]).unwrap(), n(1.0));
        assert_eq!(fn_mod(&[n(-7.0), n(3.0)]).unwrap(), n(2.0));
        assert_eq!(fn_mod(&[n(7.0), n(-3.0)]).unwrap(), n(-2.0));
        assert!(num_of(fn_mod(&[n(1.0), n(0.0)]).unwrap()).is_nan());
    }

    #[test]
    fn test_unary_math() {
        assert_eq!(fn_abs(&[n(-4.0)]).unwrap(), n(4.0));
        assert_eq!(fn_floor(&[n(-1.5)]).unwrap(), n(-2.0));
        assert_eq!(fn_ceil(&[n(1.2)]).unwrap(), n(2.0));
        assert_eq!(fn_sqrt(&[n(16.0)]).unwrap(), n(4.0));
        assert_eq!(fn_pow(&[n(2.0), n(10.0)]).unwrap(), n(1024.0));
        assert!(num_of(fn_sqrt(&[n(-1.0)]).unwrap()).is_nan());
    }
}
