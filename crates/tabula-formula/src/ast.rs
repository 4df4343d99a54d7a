//! Formula Abstract Syntax Tree types

/// Formula expression AST.
///
/// Every operator is desugared into a [`FormulaExpr::Call`] against a
/// reserved `__`-prefixed function name, so the tree has only literals,
/// variables and calls. Children are owned; the tree is acyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal (raw content, no escapes)
    String(String),
    /// Boolean literal
    Boolean(bool),

    // === References ===
    /// Variable reference, original case preserved
    Variable(String),

    // === Function call ===
    /// Function or desugared operator call; `name` is lower-case
    Call { name: String, args: Vec<FormulaExpr> },
}

impl FormulaExpr {
    /// Build a call node, lower-casing the function name
    pub fn call<S: AsRef<str>>(name: S, args: Vec<FormulaExpr>) -> Self {
        FormulaExpr::Call {
            name: name.as_ref().to_lowercase(),
            args,
        }
    }

    /// Build a variable node
    pub fn variable<S: Into<String>>(name: S) -> Self {
        FormulaExpr::Variable(name.into())
    }

    /// Check if this node is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            FormulaExpr::Number(_) | FormulaExpr::String(_) | FormulaExpr::Boolean(_)
        )
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,

    // Comparison
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Map an operator token to a binary operator
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "|" => BinaryOperator::Or,
            "&" => BinaryOperator::And,
            "=" => BinaryOperator::Equal,
            "!=" => BinaryOperator::NotEqual,
            ">" => BinaryOperator::GreaterThan,
            ">=" => BinaryOperator::GreaterEqual,
            "<" => BinaryOperator::LessThan,
            "<=" => BinaryOperator::LessEqual,
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            _ => return None,
        })
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Equal | BinaryOperator::NotEqual => 3,
            BinaryOperator::GreaterThan
            | BinaryOperator::GreaterEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessEqual => 4,
            BinaryOperator::Add | BinaryOperator::Subtract => 5,
            BinaryOperator::Multiply | BinaryOperator::Divide => 6,
        }
    }

    /// Reserved registry name the operator desugars to
    pub fn function_name(self) -> &'static str {
        match self {
            BinaryOperator::Or => "__or",
            BinaryOperator::And => "__and",
            BinaryOperator::Equal => "__eq",
            BinaryOperator::NotEqual => "__neq",
            BinaryOperator::GreaterThan => "__gt",
            BinaryOperator::GreaterEqual => "__gte",
            BinaryOperator::LessThan => "__lt",
            BinaryOperator::LessEqual => "__lte",
            BinaryOperator::Add => "__add",
            BinaryOperator::Subtract => "__sub",
            BinaryOperator::Multiply => "__mul",
            BinaryOperator::Divide => "__div",
        }
    }
}

/// Unary (prefix) operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl UnaryOperator {
    /// Map an operator token to a prefix operator
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "!" => Some(UnaryOperator::Not),
            "-" => Some(UnaryOperator::Negate),
            _ => None,
        }
    }

    /// Reserved registry name the operator desugars to
    pub fn function_name(self) -> &'static str {
        match self {
            UnaryOperator::Not => "__not",
            UnaryOperator::Negate => "__neg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_lowercases_name() {
        let expr = FormulaExpr::call("SUM", vec![FormulaExpr::Number(1.0)]);
        assert_eq!(
            expr,
            FormulaExpr::Call {
                name: "sum".into(),
                args: vec![FormulaExpr::Number(1.0)]
            }
        );
    }

    #[test]
    fn test_is_literal() {
        assert!(FormulaExpr::Number(1.0).is_literal());
        assert!(FormulaExpr::String("a".into()).is_literal());
        assert!(FormulaExpr::Boolean(false).is_literal());
        assert!(!FormulaExpr::variable("x").is_literal());
        assert!(!FormulaExpr::call("sum", vec![]).is_literal());
    }

    #[test]
    fn test_precedence_table() {
        let ops = ["|", "&", "=", "!=", ">", ">=", "<", "<=", "+", "-", "*", "/"];
        let levels: Vec<u8> = ops
            .iter()
            .map(|s| BinaryOperator::from_symbol(s).unwrap().precedence())
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 3, 4, 4, 4, 4, 5, 5, 6, 6]);
        assert_eq!(BinaryOperator::from_symbol("!"), None);
    }
}
