//! Enrollment service module for email-OTP credential issuance
//!
//! This module provides the complete enrollment workflow:
//! - OTP generation and delivery for registration and password reset
//! - Resend with a per-email throttle and cooldown window
//! - Code verification against server-authoritative time
//! - Credential finalization (activate or reset a supervisor account)

mod config;
mod password_policy;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::EnrollmentConfig;
pub use password_policy::is_strong_password;
pub use service::EnrollmentService;
pub use traits::{ClockSource, MailSenderTrait, PasswordHasherTrait};
pub use types::{FinalizeOutcome, IssueResult, VerifiedFlow};
