//! OTP record repository trait.
//!
//! One record per email, upsert semantics. The store's per-key atomicity is
//! the only coordination point between concurrent requests, so the resend
//! throttle goes through [`OtpRepository::upsert_checked`], a conditional
//! write keyed on the resend counter the caller observed at read time. That
//! keeps the single-writer-per-key invariant inside the store rather than in
//! application-level locks, and stays correct across server instances.

use async_trait::async_trait;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;

/// Repository contract for OTP record persistence
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Fetch the record for a normalized email, if one exists.
    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>, DomainError>;

    /// Insert or overwrite the record for `record.email`, invalidating any
    /// previous code for that address.
    async fn upsert(&self, record: OtpRecord) -> Result<(), DomainError>;

    /// Conditional upsert for the resend path.
    ///
    /// * `expected_resend_count == None` — write only if no record exists.
    /// * `expected_resend_count == Some(n)` — write only if the stored
    ///   record still has `resend_count == n`.
    ///
    /// Returns whether the write applied. A `false` result means another
    /// request won the race and the caller must re-read and re-evaluate.
    async fn upsert_checked(
        &self,
        record: OtpRecord,
        expected_resend_count: Option<i32>,
    ) -> Result<bool, DomainError>;

    /// Delete the record for an email. Returns whether a record was removed.
    async fn delete(&self, email: &str) -> Result<bool, DomainError>;
}
