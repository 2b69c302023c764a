//! Service error type shared by every entity service

use crate::validation::{FieldError, ValidationFailure};

/// The three outcomes a caller can act on. Store failures are opaque
/// `Internal` errors; the chain is logged, not returned.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The addressed record does not exist
    #[error("Not found")]
    NotFound,

    /// One or more fields were rejected
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Store or other infrastructure failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationFailure> for ServiceError {
    fn from(failure: ValidationFailure) -> Self {
        match failure {
            ValidationFailure::Fields(fields) => ServiceError::Validation(fields),
            ValidationFailure::Internal(err) => ServiceError::Internal(err),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
