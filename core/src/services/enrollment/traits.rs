//! Traits for the external collaborators of the enrollment engines

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for mail delivery integration
#[async_trait]
pub trait MailSenderTrait: Send + Sync {
    /// Send a passcode to an address. `resent` selects the resend wording.
    /// Returns a provider message id on success.
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        expiry_minutes: i64,
        resent: bool,
    ) -> Result<String, String>;
}

/// Trait for server-authoritative time.
///
/// Expiry arithmetic and comparisons must both use this source; caller
/// clocks are never trusted for security-relevant decisions.
#[async_trait]
pub trait ClockSource: Send + Sync {
    async fn now(&self) -> Result<DateTime<Utc>, String>;
}

/// Trait for the one-way password hashing capability
pub trait PasswordHasherTrait: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, String>;
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, String>;
}
