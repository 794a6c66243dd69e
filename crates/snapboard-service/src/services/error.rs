//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use snapboard_common::AppError;
use snapboard_core::DomainError;
use snapboard_markup::MarkupError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation, including permission and ban refusals
    Domain(DomainError),

    /// Application error
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Request failed input validation
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Refusal for an actor lacking `capability`
    pub fn missing_capability(capability: &str) -> Self {
        Self::Domain(DomainError::MissingCapability(capability.to_string()))
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller may show this error to the user as-is
    pub fn is_user_facing(&self) -> bool {
        self.status_code() < 500
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_authorization() {
                    403
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<MarkupError> for ServiceError {
    fn from(err: MarkupError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use snapboard_core::Snowflake;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Post", Snowflake::new(123));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Post not found: 123"));
    }

    #[test]
    fn test_missing_capability_error() {
        let err = ServiceError::missing_capability("moderate");
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "MISSING_CAPABILITY");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_domain_error_mapping() {
        let err = ServiceError::from(DomainError::EmptyText);
        assert_eq!(err.status_code(), 400);

        let err = ServiceError::from(DomainError::LastVisibleRevision(Snowflake::new(1)));
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "LAST_VISIBLE_REVISION");
    }

    #[test]
    fn test_markup_error_is_validation() {
        let err = ServiceError::from(MarkupError::UnsupportedDialect("rst".into()));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "UNSUPPORTED_DIALECT");
    }

    #[test]
    fn test_internal_error_hidden() {
        let err = ServiceError::internal("pool exhausted");
        assert!(!err.is_user_facing());

        let app_err: AppError = err.into();
        assert_eq!(app_err.status_code(), 500);
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err = ServiceError::not_found("Topic", "456");
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.status_code(), 404);
    }
}
