//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while lexing, parsing, evaluating formulas or
/// editing the function registry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// No token rule matches at this byte offset
    #[error("Unexpected character at {offset}: {ch}")]
    UnexpectedCharacter { offset: usize, ch: char },

    /// A `(` was never closed
    #[error("Missing closing parenthesis")]
    MissingClosingParen,

    /// A token appeared where it cannot be used
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    /// The formula ended where an operand was required
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Variable is not defined in the local or global context
    #[error("Variable \"{0}\" not found")]
    VariableNotFound(String),

    /// No function registered under this name
    #[error("Function \"{0}\" not found")]
    FunctionNotFound(String),

    /// Registration with an empty name
    #[error("Function name must be a non-empty string")]
    InvalidFunctionName,

    /// Registration target does not resolve to a callable
    #[error("Function implementation must be a function")]
    NotAFunction,

    /// Attempt to remove a built-in function
    #[error("Cannot unregister built-in function \"{0}\"")]
    BuiltinFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Failure raised by a host-registered function
    #[error("{0}")]
    Custom(String),
}

/// Broad category of a [`FormulaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized character in the source text
    Lexical,
    /// Unexpected or missing token
    Syntax,
    /// Unknown variable or function at evaluation time
    Name,
    /// Invalid registry mutation
    Registration,
    /// Raised by a function body
    Function,
}

impl FormulaError {
    /// Create a host-defined error with a message shown verbatim
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        FormulaError::Custom(msg.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::UnexpectedCharacter { .. } => ErrorKind::Lexical,
            FormulaError::MissingClosingParen
            | FormulaError::UnexpectedToken(_)
            | FormulaError::UnexpectedEnd => ErrorKind::Syntax,
            FormulaError::VariableNotFound(_) | FormulaError::FunctionNotFound(_) => {
                ErrorKind::Name
            }
            FormulaError::InvalidFunctionName
            | FormulaError::NotAFunction
            | FormulaError::BuiltinFunction(_) => ErrorKind::Registration,
            FormulaError::ArgumentCount { .. }
            | FormulaError::Argument(_)
            | FormulaError::Custom(_) => ErrorKind::Function,
        }
    }
}
