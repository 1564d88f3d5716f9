//! Supervisor account repository trait.
//!
//! Accounts are created by an external administrative process; this
//! subsystem only reads them and writes credential state. Both write
//! operations report whether a row was actually touched so the caller can
//! distinguish "updated" from "no such account".

use async_trait::async_trait;

use crate::domain::entities::otp_record::RegistrationProfile;
use crate::domain::entities::supervisor::SupervisorAccount;
use crate::errors::DomainError;

/// Repository contract for supervisor account persistence
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<SupervisorAccount>, DomainError>;

    /// First activation: write the staged profile fields and the password
    /// hash onto the pre-provisioned row.
    async fn activate(
        &self,
        email: &str,
        profile: &RegistrationProfile,
        password_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Replace only the password hash on an existing account.
    async fn reset_password(&self, email: &str, password_hash: &str) -> Result<bool, DomainError>;
}
