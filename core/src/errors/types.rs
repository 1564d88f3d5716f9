//! Error taxonomy for the OTP enrollment flow.
//!
//! These errors represent the user-facing failure scenarios of the
//! issuance, resend, verification, and finalization steps. Presentation
//! concerns (HTTP status, response body) are handled in the api layer.

use thiserror::Error;

/// Errors raised by the enrollment engines
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Disposable emails are not allowed")]
    DisposableEmail { domain: String },

    #[error("Email not found in supervisor records")]
    AccountNotFound,

    #[error("Account already exists. Please log in")]
    AlreadyActivated,

    #[error("Account not found or not yet registered")]
    NotYetActivated,

    #[error("No OTP found for this email")]
    OtpNotFound,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Incorrect OTP")]
    CodeMismatch,

    #[error("Resend limit reached. Please try again in {wait_minutes} minute(s)")]
    ResendLimitExceeded { wait_minutes: i64 },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must contain an uppercase letter, a lowercase letter, and a number (min 8 chars)")]
    WeakPassword,

    #[error("Could not verify server time")]
    ClockUnavailable,

    #[error("Failed to send OTP")]
    DeliveryFailure,
}

impl EnrollmentError {
    /// Stable machine-readable code for API responses and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            EnrollmentError::InvalidEmail => "INVALID_EMAIL",
            EnrollmentError::DisposableEmail { .. } => "DISPOSABLE_EMAIL",
            EnrollmentError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            EnrollmentError::AlreadyActivated => "ALREADY_ACTIVATED",
            EnrollmentError::NotYetActivated => "NOT_YET_ACTIVATED",
            EnrollmentError::OtpNotFound => "OTP_NOT_FOUND",
            EnrollmentError::OtpExpired => "OTP_EXPIRED",
            EnrollmentError::CodeMismatch => "CODE_MISMATCH",
            EnrollmentError::ResendLimitExceeded { .. } => "RESEND_LIMIT_EXCEEDED",
            EnrollmentError::PasswordMismatch => "PASSWORD_MISMATCH",
            EnrollmentError::WeakPassword => "WEAK_PASSWORD",
            EnrollmentError::ClockUnavailable => "CLOCK_UNAVAILABLE",
            EnrollmentError::DeliveryFailure => "DELIVERY_FAILURE",
        }
    }
}
