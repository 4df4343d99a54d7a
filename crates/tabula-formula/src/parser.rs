//! Formula parser
//!
//! A precedence-climbing parser over the token stream produced by
//! [`crate::lexer::tokenize`]. Operators are desugared into calls against
//! reserved function names while parsing.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use tabula_formula::parse_formula;
///
/// let ast = parse_formula("1 + 2").unwrap();
/// let ast = parse_formula("sum(a, b) * 2").unwrap();
/// let ast = parse_formula("if(x > 0, \"pos\", \"neg\")").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let tokens = tokenize(formula)?;
    parse(&tokens)
}

/// Parse a token sequence into an AST.
///
/// The whole sequence must form one expression; leftover tokens are an error.
pub fn parse(tokens: &[Token]) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(tokens);
    let expr = parser.parse_expression(0)?;

    // Make sure we consumed all input
    if let Some(token) = parser.current_token() {
        return Err(FormulaError::UnexpectedToken(token.text.clone()));
    }

    Ok(expr)
}

/// Formula parser
struct FormulaParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    // === Helper methods ===

    fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> FormulaResult<&'a Token> {
        let token = self.current_token().ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn at_delimiter(&self, delim: &str) -> bool {
        self.current_token().is_some_and(|t| t.is_delimiter(delim))
    }

    fn expect_closing_paren(&mut self) -> FormulaResult<()> {
        if self.at_delimiter(")") {
            self.pos += 1;
            Ok(())
        } else {
            Err(FormulaError::MissingClosingParen)
        }
    }

    /// Binary operator at the cursor, if any
    fn current_binary_operator(&self) -> Option<BinaryOperator> {
        self.current_token()
            .filter(|t| t.kind == TokenKind::Operator)
            .and_then(|t| BinaryOperator::from_symbol(&t.text))
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. |
    // 2. &
    // 3. =, !=
    // 4. >, >=, <, <=
    // 5. +, -
    // 6. *, /
    // Prefix ! and - are part of the atom and bind tighter than all of these.

    fn parse_expression(&mut self, min_precedence: u8) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_atom()?;

        while let Some(op) = self.current_binary_operator() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            self.pos += 1;
            // precedence + 1 keeps equal-precedence chains left-associative
            let right = self.parse_expression(precedence + 1)?;
            left = FormulaExpr::call(op.function_name(), vec![left, right]);
        }

        Ok(left)
    }

    fn parse_atom(&mut self) -> FormulaResult<FormulaExpr> {
        let token = self.consume()?;

        match token.kind {
            TokenKind::Operator => match UnaryOperator::from_symbol(&token.text) {
                Some(op) => {
                    let operand = self.parse_atom()?;
                    Ok(FormulaExpr::call(op.function_name(), vec![operand]))
                }
                None => Err(FormulaError::UnexpectedToken(token.text.clone())),
            },

            TokenKind::Number => token
                .text
                .parse()
                .map(FormulaExpr::Number)
                .map_err(|_| FormulaError::UnexpectedToken(token.text.clone())),

            TokenKind::String => Ok(FormulaExpr::String(token.text.clone())),

            TokenKind::Identifier => match token.text.as_str() {
                "true" => Ok(FormulaExpr::Boolean(true)),
                "false" => Ok(FormulaExpr::Boolean(false)),
                name if self.at_delimiter("(") => {
                    self.pos += 1;
                    self.parse_function_call(name)
                }
                name => Ok(FormulaExpr::variable(name)),
            },

            TokenKind::Delimiter if token.text == "(" => {
                let expr = self.parse_expression(0)?;
                self.expect_closing_paren()?;
                Ok(expr)
            }

            TokenKind::Delimiter => Err(FormulaError::UnexpectedToken(token.text.clone())),
        }
    }

    /// Parse the argument list after `name(`
    fn parse_function_call(&mut self, name: &str) -> FormulaResult<FormulaExpr> {
        let mut args = Vec::new();

        if !self.at_delimiter(")") {
            args.push(self.parse_expression(0)?);

            while self.at_delimiter(",") {
                self.pos += 1;
                args.push(self.parse_expression(0)?);
            }
        }

        self.expect_closing_paren()?;

        Ok(FormulaExpr::call(name, args))
    }
}
