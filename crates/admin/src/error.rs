use thiserror::Error;

use rolegate_core::DomainError;
use rolegate_infra::StoreError;

/// Client-facing text for failures the caller cannot fix.
pub const UNEXPECTED_MESSAGE: &str = "An error occurred while processing your request.";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome classes of a failed service operation.
///
/// The API maps these one-to-one onto 400 / 404 / 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {details}")]
    Unexpected { message: String, details: String },
}

impl ServiceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unexpected(details: impl Into<String>) -> Self {
        Self::Unexpected {
            message: UNEXPECTED_MESSAGE.to_string(),
            details: details.into(),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::InvalidInput(msg),
            DomainError::InvalidId(msg) => ServiceError::InvalidInput(msg),
            DomainError::NotFound(msg) => ServiceError::NotFound(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UniqueViolation(msg) | StoreError::ForeignKeyViolation(msg) => {
                ServiceError::InvalidInput(msg)
            }
            StoreError::Backend(msg) => {
                tracing::error!(error = %msg, "directory store failure");
                ServiceError::unexpected(msg)
            }
        }
    }
}

/// Translate a constraint violation raised by a write into the message the
/// matching pre-write check would have produced.
pub(crate) fn constraint_error(
    err: StoreError,
    on_unique: &str,
    on_foreign_key: &str,
) -> ServiceError {
    match err {
        StoreError::UniqueViolation(detail) => {
            tracing::warn!(%detail, "unique constraint hit after validation");
            ServiceError::invalid_input(on_unique)
        }
        StoreError::ForeignKeyViolation(detail) => {
            tracing::warn!(%detail, "foreign key constraint hit after validation");
            ServiceError::invalid_input(on_foreign_key)
        }
        other => other.into(),
    }
}
