//! Enrollment route handlers
//!
//! Endpoints covering the full credential flow:
//! - Starting registration or password reset (OTP issuance)
//! - Rendering and submitting the verification prompt
//! - Resending a passcode
//! - Finalizing with a new password

pub mod finalize;
pub mod provision_start;
pub mod resend;
pub mod verify;

use std::sync::Arc;

use itsp_core::repositories::{AccountRepository, OtpRepository};
use itsp_core::services::{
    ClockSource, EnrollmentService, MailSenderTrait, PasswordHasherTrait,
};

/// Application state that holds the shared enrollment service
pub struct AppState<A, O, M, K, H>
where
    A: AccountRepository,
    O: OtpRepository,
    M: MailSenderTrait,
    K: ClockSource,
    H: PasswordHasherTrait,
{
    pub enrollment_service: Arc<EnrollmentService<A, O, M, K, H>>,
}
