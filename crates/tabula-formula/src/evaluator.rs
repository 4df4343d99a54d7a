//! Formula evaluator
//!
//! Walks a [`FormulaExpr`] against a variable [`Scope`] and a
//! [`FunctionRegistry`]. `if` and `iferr` are special forms recognized by
//! name before any registry lookup; every other call evaluates its
//! arguments eagerly, left to right.

use crate::ast::FormulaExpr;
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use tabula_core::{Scope, Value};

/// Context for formula evaluation
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Variables visible to the formula
    pub scope: Scope<'a>,
    /// Functions callable from the formula
    pub registry: &'a FunctionRegistry,
    /// Enforce declared argument counts before calling a function
    pub check_arity: bool,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(scope: Scope<'a>, registry: &'a FunctionRegistry) -> Self {
        Self {
            scope,
            registry,
            check_arity: true,
        }
    }

    /// Enable or disable arity checking
    pub fn with_arity_check(mut self, check_arity: bool) -> Self {
        self.check_arity = check_arity;
        self
    }

    fn lookup_variable(&self, name: &str) -> FormulaResult<Value> {
        self.scope
            .get(name)
            .cloned()
            .ok_or_else(|| FormulaError::VariableNotFound(name.to_string()))
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<Value> {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(Value::Number(*n)),
        FormulaExpr::String(s) => Ok(Value::String(s.clone())),
        FormulaExpr::Boolean(b) => Ok(Value::Boolean(*b)),

        // === References ===
        FormulaExpr::Variable(name) => ctx.lookup_variable(name),

        // === Calls ===
        FormulaExpr::Call { name, args } => match name.as_str() {
            "if" => evaluate_if(args, ctx),
            "iferr" => evaluate_iferr(args, ctx),
            _ => evaluate_function(name, args, ctx),
        },
    }
}

/// Argument count check shared by the special forms
fn check_special_arity(
    name: &str,
    args: &[FormulaExpr],
    max: usize,
    ctx: &EvaluationContext,
) -> FormulaResult<()> {
    if args.is_empty() || (ctx.check_arity && args.len() > max) {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("1 to {}", max),
            actual: args.len(),
        });
    }
    Ok(())
}

/// IF(condition, when_true, [when_false]) - only the chosen branch is evaluated
fn evaluate_if(args: &[FormulaExpr], ctx: &EvaluationContext) -> FormulaResult<Value> {
    check_special_arity("if", args, 3, ctx)?;

    let condition = evaluate(&args[0], ctx)?;
    let branch = if condition.is_truthy() {
        args.get(1)
    } else {
        args.get(2)
    };

    match branch {
        Some(expr) => evaluate(expr, ctx),
        None => Ok(Value::Null),
    }
}

/// IFERR(value, fallback) - fallback is evaluated only if value fails
fn evaluate_iferr(args: &[FormulaExpr], ctx: &EvaluationContext) -> FormulaResult<Value> {
    check_special_arity("iferr", args, 2, ctx)?;

    match evaluate(&args[0], ctx) {
        Ok(value) => Ok(value),
        Err(e) => {
            log::debug!("iferr recovered from: {e}");
            match args.get(1) {
                Some(fallback) => evaluate(fallback, ctx),
                None => Ok(Value::Null),
            }
        }
    }
}

/// Evaluate a function call
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    ctx: &EvaluationContext,
) -> FormulaResult<Value> {
    let func = ctx
        .registry
        .get(name)
        .ok_or_else(|| FormulaError::FunctionNotFound(name.to_string()))?;

    // Evaluate arguments
    let mut evaluated_args = Vec::with_capacity(args.len());
    for arg in args {
        evaluated_args.push(evaluate(arg, ctx)?);
    }

    // Argument errors take priority over a wrong argument count
    if ctx.check_arity {
        func.check_arity(evaluated_args.len())?;
    }

    log::trace!("calling {name} with {} argument(s)", evaluated_args.len());

    // Call the function
    func.call(&evaluated_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tabula_core::Context;

    fn eval_with(formula: &str, vars: &Context) -> FormulaResult<Value> {
        let ast = parse_formula(formula)?;
        let registry = FunctionRegistry::new();
        let globals = Context::new();
        let ctx = EvaluationContext::new(Scope::new(vars, &globals), &registry);
        evaluate(&ast, &ctx)
    }

    fn eval(formula: &str) -> FormulaResult<Value> {
        eval_with(formula, &Context::new())
    }

    #[test]
    fn test_evaluate_literals() {
        assert_eq!(eval("42").unwrap(), Value::Number(42.0));
        assert_eq!(eval("\"Hello\"").unwrap(), Value::string("Hello"));
        assert_eq!(eval("true").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("1+2").unwrap(), Value::Number(3.0));
        assert_eq!(eval("10-3").unwrap(), Value::Number(7.0));
        assert_eq!(eval("4*5").unwrap(), Value::Number(20.0));
        assert_eq!(eval("20/4").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), Value::Number(14.0));
        assert_eq!(eval("(2 + 3) * 4").unwrap(), Value::Number(20.0));
        assert_eq!(eval("10 - 3 - 2").unwrap(), Value::Number(5.0));
        assert_eq!(eval("24 / 4 / 2").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_evaluate_unary() {
        let vars = Context::new().with("x", 7);
        assert_eq!(eval_with("-x + 1", &vars).unwrap(), Value::Number(-6.0));
        assert_eq!(eval("--5").unwrap(), Value::Number(5.0));
        assert_eq!(eval("!0").unwrap(), Value::Boolean(true));
        assert_eq!(eval("!!\"x\"").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_evaluate_comparison_and_logic() {
        assert_eq!(eval("1 < 2").unwrap(), Value::Boolean(true));
        assert_eq!(eval("2 >= 3").unwrap(), Value::Boolean(false));
        assert_eq!(eval("5 = 5").unwrap(), Value::Boolean(true));
        assert_eq!(eval("5 != 5").unwrap(), Value::Boolean(false));
        assert_eq!(eval("1 < 2 & 3 > 4").unwrap(), Value::Boolean(false));
        assert_eq!(eval("1 < 2 | 3 > 4").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_evaluate_string_concatenation() {
        assert_eq!(
            eval("\"Value: \" + 42").unwrap(),
            Value::string("Value: 42")
        );
    }

    #[test]
    fn test_unknown_variable() {
        assert_eq!(
            eval("y + 1").unwrap_err().to_string(),
            "Variable \"y\" not found"
        );
    }

    #[test]
    fn test_variables_are_case_sensitive() {
        let vars = Context::new().with("x", 1);
        assert_eq!(
            eval_with("X", &vars).unwrap_err(),
            FormulaError::VariableNotFound("X".into())
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("NOPE(1)").unwrap_err().to_string(),
            "Function \"nope\" not found"
        );
    }

    #[test]
    fn test_functions_are_case_insensitive() {
        assert_eq!(eval("SUM(1,2)").unwrap(), eval("sum(1,2)").unwrap());
    }

    #[test]
    fn test_evaluate_if() {
        assert_eq!(eval("if(true, 1, 2)").unwrap(), Value::Number(1.0));
        assert_eq!(eval("if(0, 1, 2)").unwrap(), Value::Number(2.0));
        assert_eq!(eval("if(\"\", 1, 2)").unwrap(), Value::Number(2.0));
        assert_eq!(eval("IF(1 > 0, \"Yes\", \"No\")").unwrap(), Value::string("Yes"));
        assert_eq!(eval("if(false, 1)").unwrap(), Value::Null);
    }

    #[test]
    fn test_if_skips_untaken_branch() {
        assert_eq!(eval("if(true, 1, unknownVar)").unwrap(), Value::Number(1.0));
        assert_eq!(eval("if(false, nope(), 2)").unwrap(), Value::Number(2.0));
        // The taken branch still fails normally
        assert!(eval("if(false, 1, unknownVar)").is_err());
    }

    #[test]
    fn test_if_never_calls_untaken_branch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut registry = FunctionRegistry::new();
        registry
            .register_fn("tick", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Number(1.0))
            })
            .unwrap();

        let empty = Context::new();
        let ctx = EvaluationContext::new(Scope::new(&empty, &empty), &registry);

        let ast = parse_formula("if(1, 10, tick())").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(10.0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let ast = parse_formula("iferr(5, tick())").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(5.0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let ast = parse_formula("if(0, 10, tick())").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(1.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_evaluate_iferr() {
        assert_eq!(eval("iferr(unknownVar, 42)").unwrap(), Value::Number(42.0));
        assert_eq!(eval("iferr(7, 42)").unwrap(), Value::Number(7.0));
        assert_eq!(eval("iferr(nope(), \"fallback\")").unwrap(), Value::string("fallback"));
        assert_eq!(eval("iferr(unknownVar)").unwrap(), Value::Null);
        // Errors in the fallback propagate
        assert!(eval("iferr(a, b)").is_err());
        // Nested: the inner iferr absorbs the error
        assert_eq!(
            eval("iferr(iferr(a, b), 3)").unwrap(),
            Value::Number(3.0)
        );
    }

    #[test]
    fn test_host_error_caught_by_iferr() {
        let mut registry = FunctionRegistry::new();
        registry
            .register_fn("fail", |_| Err(FormulaError::custom("boom")))
            .unwrap();

        let empty = Context::new();
        let ctx = EvaluationContext::new(Scope::new(&empty, &empty), &registry);

        let ast = parse_formula("fail()").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap_err().to_string(), "boom");

        let ast = parse_formula("iferr(fail(), 0)").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_special_form_arity() {
        assert!(matches!(
            eval("if()").unwrap_err(),
            FormulaError::ArgumentCount { .. }
        ));
        assert!(matches!(
            eval("iferr(1, 2, 3)").unwrap_err(),
            FormulaError::ArgumentCount { .. }
        ));
    }

    #[test]
    fn test_arguments_evaluated_before_arity_check() {
        assert_eq!(
            eval("abs(unknownVar, 1)").unwrap_err(),
            FormulaError::VariableNotFound("unknownVar".into())
        );
        assert_eq!(
            eval("abs(1, nope())").unwrap_err(),
            FormulaError::FunctionNotFound("nope".into())
        );
    }

    #[test]
    fn test_arity_check_toggle() {
        assert!(matches!(
            eval("abs(1, 2)").unwrap_err(),
            FormulaError::ArgumentCount { .. }
        ));

        let registry = FunctionRegistry::new();
        let empty = Context::new();
        let ctx = EvaluationContext::new(Scope::new(&empty, &empty), &registry)
            .with_arity_check(false);
        let ast = parse_formula("abs(-1, 2)").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_operator_override_through_registry() {
        let mut registry = FunctionRegistry::new();
        registry
            .register_fn("__add", |_| Ok(Value::string("intercepted")))
            .unwrap();

        let empty = Context::new();
        let ctx = EvaluationContext::new(Scope::new(&empty, &empty), &registry);
        let ast = parse_formula("1 + 1").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), Value::string("intercepted"));
    }

    #[test]
    fn test_evaluate_nested_functions() {
        assert_eq!(
            eval("sum(1, if(true, 10, 20), 3)").unwrap(),
            Value::Number(14.0)
        );
        assert_eq!(
            eval("if(and(1 > 0, 2 < 3), sum(1, 2, 3) * 2, 0)").unwrap(),
            Value::Number(12.0)
        );
        assert_eq!(eval("avg(2, 4, 6)").unwrap(), Value::Number(4.0));
        assert_eq!(eval("upper(\"ab\") + len(\"xyz\")").unwrap(), Value::string("AB3"));
    }
}
