//! Formula lexer
//!
//! Splits formula text into [`Token`]s by trying a fixed, ordered list of
//! anchored rules at the current offset. The first rule that matches wins;
//! whitespace is consumed but never emitted.

use crate::error::{FormulaError, FormulaResult};
use lazy_regex::regex;
use regex::Regex;

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Operator,
    Delimiter,
}

/// A classified lexical unit with its half-open byte span in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Token text; for strings, the content without the quotes
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Check if this is the given operator
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Check if this is the given delimiter
    pub fn is_delimiter(&self, delim: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.text == delim
    }
}

/// Token rules in priority order. `None` marks whitespace, which is skipped.
fn rules() -> [(Option<TokenKind>, &'static Regex); 6] {
    [
        (Some(TokenKind::String), regex!(r#"^"[^"]*""#)),
        // `.5` is a number, `5.` is not: the digit run after the dot is mandatory
        (Some(TokenKind::Number), regex!(r"^[0-9]*\.?[0-9]+")),
        (Some(TokenKind::Identifier), regex!(r"^[A-Za-z][A-Za-z0-9_]*")),
        // Two-character operators first so `>=` is not split into `>` `=`
        (Some(TokenKind::Operator), regex!(r"^(?:!=|>=|<=|[-+=><&|*/!])")),
        (Some(TokenKind::Delimiter), regex!(r"^[(),]")),
        (None, regex!(r"^\s+")),
    ]
}

/// Tokenize formula text.
///
/// Fails on the first position where no rule matches; no partial token list
/// is returned.
///
/// # Example
/// ```rust
/// use tabula_formula::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize("a >= 10").unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].kind, TokenKind::Operator);
/// assert_eq!(tokens[1].text, ">=");
/// ```
pub fn tokenize(text: &str) -> FormulaResult<Vec<Token>> {
    let rules = rules();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        let matched = rules
            .iter()
            .find_map(|(kind, re)| re.find(rest).map(|m| (*kind, m.end())));

        let (kind, len) = match matched {
            Some(hit) => hit,
            None => {
                return Err(FormulaError::UnexpectedCharacter {
                    offset: pos,
                    ch: rest.chars().next().unwrap_or_default(),
                })
            }
        };

        if let Some(kind) = kind {
            let raw = &rest[..len];
            let text = if kind == TokenKind::String {
                raw[1..raw.len() - 1].to_string()
            } else {
                raw.to_string()
            };
            tokens.push(Token {
                kind,
                text,
                start: pos,
                end: pos + len,
            });
        }

        pos += len;
    }

    log::trace!("tokenized {} bytes into {} tokens", text.len(), tokens.len());
    Ok(tokens)
}
