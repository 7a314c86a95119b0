//! Error types for template rendering

use fieldweave_common::{ErrorSeverity, Severity};
use fieldweave_fields::AccessError;
use thiserror::Error;

/// Hard failures raised while rendering a template.
///
/// Unresolved fields and blank expansions are not errors; they render as
/// empty text.
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// A conditional used an operator outside `eq ne neq lt gt le ge`
    #[error("invalid conditional operator '{operator}'")]
    InvalidOperator { operator: String },

    /// An expand ordering entry had a direction other than ASC or DESC
    #[error("invalid ordering directive '{entry}': direction must be ASC or DESC")]
    InvalidOrder { entry: String },

    /// Random token parameters were missing, unparseable or out of range
    #[error("invalid random token: {message}")]
    InvalidRandom { message: String },

    #[error("unknown system keyword '{keyword}'")]
    UnknownSystemKeyword { keyword: String },

    /// The formula evaluator rejected an expression
    #[error("formula '{expression}' failed: {message}")]
    Formula { expression: String, message: String },

    #[error("template nesting too deep: {depth} levels (max allowed: {max})")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("template too large: {size} bytes (max allowed: {max})")]
    TemplateTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl TemplatingError {
    pub fn invalid_random(message: impl Into<String>) -> Self {
        TemplatingError::InvalidRandom {
            message: message.into(),
        }
    }
}

impl Severity for TemplatingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TemplatingError::NestingTooDeep { .. } | TemplatingError::TemplateTooLarge { .. } => {
                ErrorSeverity::Critical
            }
            TemplatingError::Access(inner) => inner.severity(),
            _ => ErrorSeverity::Error,
        }
    }
}

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;
