use std::fmt;

/// Errors produced when parsing a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    formula: String,
    message: String,
}

impl ParseError {
    pub(crate) fn new(formula: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            message: message.into(),
        }
    }

    /// The formula text that failed to parse.
    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error in `{}`: {}", self.formula, self.message)
    }
}

impl std::error::Error for ParseError {}
