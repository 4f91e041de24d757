//! Domain-level errors.
//!
//! Business rule violations only. Authentication, persistence and transport
//! failures belong to `common::AppError`.

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input failed a field or cross-field rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// State invariant violated (duplicate, closed job, terminal status)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller lacks the required role or ownership
    #[error("Forbidden")]
    Forbidden,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
