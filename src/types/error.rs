use thiserror::Error;

use crate::parse::ParseError;

/// Failure while evaluating a compiled [`Expression`](super::Expression).
///
/// Evaluation errors are never fatal to a stylesheet: rule accessors log them
/// and fall back to their default value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("unbound name '{name}'")]
    UnboundName { name: String },

    #[error("unknown function '{function}'")]
    UnknownFunction { function: String },

    #[error("function '{function}' expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },
}

/// Failure while building an object expression (a `_type` mapping).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("object mapping is missing the '_type' discriminator")]
    MissingType,

    #[error("no object factory registered for '_type: {name}'")]
    UnknownType { name: String },

    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

/// Structural errors that abort a stylesheet load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed stylesheet: {message}")]
    MalformedStylesheet { message: String },

    #[error("malformed rule '{key}' in style '{style}': {reason}")]
    MalformedRule {
        style: String,
        key: String,
        reason: String,
    },

    #[error("invalid key in style '{style}': keys must be strings")]
    InvalidKey { style: String },

    #[error("imported stylesheet '{file}' not found")]
    ImportNotFound { file: String },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from strict style lookups such as [`Stylesheet::rule()`](super::Stylesheet::rule).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown style '{style}'")]
    UnknownStyle { style: String },

    #[error("style '{style}' does not declare property '{property}'")]
    UnknownProperty { style: String, property: String },
}

/// Reason a single rule failed to build. Converted into
/// [`LoadError::MalformedRule`] once the owning style is known.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Formula(#[from] ParseError),

    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl RuleError {
    pub(crate) fn into_load_error(self, style: &str, key: &str) -> LoadError {
        LoadError::MalformedRule {
            style: style.to_owned(),
            key: key.to_owned(),
            reason: self.to_string(),
        }
    }
}
