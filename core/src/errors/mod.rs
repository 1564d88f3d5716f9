//! Domain-specific error types and error handling.

mod types;

pub use types::EnrollmentError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the enrollment error taxonomy
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),
}

pub type DomainResult<T> = Result<T, DomainError>;
