//! Markup errors

use snapboard_core::{DialectParseError, DomainError};
use thiserror::Error;

/// Errors from the markup layer.
///
/// Malformed input is never an error; it only lowers the fidelity of the
/// output (see [`Rendered::degraded`](crate::Rendered)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("Unsupported markup dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Global markup registry is already set")]
    GlobalAlreadySet,
}

impl From<DialectParseError> for MarkupError {
    fn from(err: DialectParseError) -> Self {
        Self::UnsupportedDialect(err.0)
    }
}

impl From<MarkupError> for DomainError {
    fn from(err: MarkupError) -> Self {
        match err {
            MarkupError::UnsupportedDialect(tag) => DomainError::UnsupportedDialect(tag),
            MarkupError::GlobalAlreadySet => DomainError::InternalError(err.to_string()),
        }
    }
}
