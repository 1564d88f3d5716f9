//! Domain error to HTTP response mapping.
//!
//! User-correctable failures keep their domain message; infrastructure
//! failures are logged in full server-side and reported with a generic
//! message so internals never leak into response bodies.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use itsp_core::errors::{DomainError, EnrollmentError};

use crate::dto::ErrorResponse;

/// Convert a domain error to an HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Enrollment(e) => handle_enrollment_error(e),
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("VALIDATION_ERROR", message))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            "NOT_FOUND",
            format!("{} not found", resource),
        )),
        DomainError::Database(detail) => {
            log::error!("Database error: {}", detail);
            internal_error()
        }
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            internal_error()
        }
    }
}

fn handle_enrollment_error(error: EnrollmentError) -> HttpResponse {
    let code = error.error_code();

    match error {
        EnrollmentError::InvalidEmail
        | EnrollmentError::DisposableEmail { .. }
        | EnrollmentError::OtpExpired
        | EnrollmentError::CodeMismatch
        | EnrollmentError::PasswordMismatch
        | EnrollmentError::WeakPassword => {
            HttpResponse::BadRequest().json(ErrorResponse::new(code, error.to_string()))
        }

        EnrollmentError::AccountNotFound
        | EnrollmentError::NotYetActivated
        | EnrollmentError::OtpNotFound => {
            HttpResponse::NotFound().json(ErrorResponse::new(code, error.to_string()))
        }

        EnrollmentError::AlreadyActivated => {
            HttpResponse::Conflict().json(ErrorResponse::new(code, error.to_string()))
        }

        EnrollmentError::ResendLimitExceeded { wait_minutes } => {
            let unit = if wait_minutes == 1 { "minute" } else { "minutes" };
            HttpResponse::TooManyRequests().json(
                ErrorResponse::new(
                    code,
                    format!(
                        "Resend limit reached. Please try again in {} {}",
                        wait_minutes, unit
                    ),
                )
                .with_wait(wait_minutes),
            )
        }

        EnrollmentError::ClockUnavailable => {
            log::error!("Server clock unavailable");
            internal_error()
        }

        EnrollmentError::DeliveryFailure => {
            log::error!("OTP mail delivery failed");
            HttpResponse::BadGateway().json(ErrorResponse::new(
                code,
                "Failed to send OTP. Please try resending",
            ))
        }
    }
}

/// Convert DTO validation failures to a 400 response
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    log::warn!("Request validation failed on fields: {:?}", fields);
    HttpResponse::BadRequest().json(ErrorResponse::new(
        "VALIDATION_ERROR",
        format!("Invalid request data in: {}", fields.join(", ")),
    ))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        "INTERNAL_ERROR",
        "Something went wrong. Please try again",
    ))
}
