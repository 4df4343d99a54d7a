//! Dependency collection
//!
//! Finds the variables a formula reads without evaluating it, so the
//! variables need not have values yet.

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::parser::parse_formula;
use ahash::AHashSet;

/// Variable names referenced by an expression, in first-occurrence order
/// and without duplicates. Function and operator names are never included.
pub fn collect_variables(expr: &FormulaExpr) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut ordered = Vec::new();
    walk(expr, &mut seen, &mut ordered);
    ordered
}

/// Parse a formula and collect its variable names
pub fn formula_dependencies(formula: &str) -> FormulaResult<Vec<String>> {
    let ast = parse_formula(formula)?;
    Ok(collect_variables(&ast))
}

fn walk<'a>(expr: &'a FormulaExpr, seen: &mut AHashSet<&'a str>, ordered: &mut Vec<String>) {
    match expr {
        FormulaExpr::Variable(name) => {
            if seen.insert(name.as_str()) {
                ordered.push(name.clone());
            }
        }
        FormulaExpr::Call { args, .. } => {
            for arg in args {
                walk(arg, seen, ordered);
            }
        }
        FormulaExpr::Number(_) | FormulaExpr::String(_) | FormulaExpr::Boolean(_) => {}
    }
}
