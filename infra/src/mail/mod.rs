//! Mail delivery module
//!
//! Implementations of the `MailSenderTrait` collaborator from `itsp_core`:
//!
//! - **SMTP**: production delivery through lettre
//! - **Mock**: console output for development and testing
//!
//! Both render the same one-time-passcode message; the subject carries a
//! "(Resent)" marker on resend so recipients can tell stale codes apart.

pub mod mock_mail;
pub mod smtp;

pub use mock_mail::MockMailSender;
pub use smtp::{SmtpConfig, SmtpMailSender};

use async_trait::async_trait;
use itsp_core::services::MailSenderTrait;

/// Subject line for an OTP message.
pub(crate) fn otp_subject(resent: bool) -> &'static str {
    if resent {
        "Your OTP Code (Resent)"
    } else {
        "Your OTP Code"
    }
}

/// Plain-text body for an OTP message.
pub(crate) fn otp_body(code: &str, expiry_minutes: i64) -> String {
    format!(
        "Your OTP code is {}. It will expire in {} minutes.",
        code, expiry_minutes
    )
}

/// Runtime-selected mail transport.
///
/// The enrollment service is generic over its mail collaborator, so the
/// choice between real SMTP and the console mock is made once at startup
/// and wrapped here instead of leaking into the handler types.
pub enum MailSender {
    Smtp(SmtpMailSender),
    Mock(MockMailSender),
}

#[async_trait]
impl MailSenderTrait for MailSender {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        expiry_minutes: i64,
        resent: bool,
    ) -> Result<String, String> {
        match self {
            MailSender::Smtp(inner) => inner.send_otp(to, code, expiry_minutes, resent).await,
            MailSender::Mock(inner) => inner.send_otp(to, code, expiry_minutes, resent).await,
        }
    }
}
