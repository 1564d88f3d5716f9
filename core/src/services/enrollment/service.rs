//! Main enrollment service implementation

use chrono::Duration;
use std::sync::Arc;

use crate::domain::entities::otp_record::{FlowMode, OtpRecord, RegistrationProfile, StagedPayload};
use crate::domain::value_objects::email::EmailAddress;
use crate::errors::{DomainError, DomainResult, EnrollmentError};
use crate::repositories::{AccountRepository, OtpRepository};

use super::config::EnrollmentConfig;
use super::password_policy::is_strong_password;
use super::traits::{ClockSource, MailSenderTrait, PasswordHasherTrait};
use super::types::{FinalizeOutcome, IssueResult, VerifiedFlow};

/// Bounded retries for the resend conditional write before giving up
const RESEND_WRITE_RETRIES: u32 = 3;

/// Enrollment service for the OTP onboarding and recovery flows.
///
/// Issuance, resend, verification, and finalization are separate
/// externally-triggered steps; the OTP record persisted between them, keyed
/// by email, is the only cross-request state.
pub struct EnrollmentService<A, O, M, K, H>
where
    A: AccountRepository,
    O: OtpRepository,
    M: MailSenderTrait,
    K: ClockSource,
    H: PasswordHasherTrait,
{
    accounts: Arc<A>,
    otps: Arc<O>,
    mail: Arc<M>,
    clock: Arc<K>,
    hasher: Arc<H>,
    config: EnrollmentConfig,
}

impl<A, O, M, K, H> EnrollmentService<A, O, M, K, H>
where
    A: AccountRepository,
    O: OtpRepository,
    M: MailSenderTrait,
    K: ClockSource,
    H: PasswordHasherTrait,
{
    pub fn new(
        accounts: Arc<A>,
        otps: Arc<O>,
        mail: Arc<M>,
        clock: Arc<K>,
        hasher: Arc<H>,
        config: EnrollmentConfig,
    ) -> Self {
        Self {
            accounts,
            otps,
            mail,
            clock,
            hasher,
            config,
        }
    }

    pub fn config(&self) -> &EnrollmentConfig {
        &self.config
    }

    /// Start the registration flow for a pre-provisioned account.
    ///
    /// The email must belong to an account that exists and has no password
    /// hash yet; an already-activated account is a conflict, not a retry
    /// condition.
    pub async fn start_registration(
        &self,
        email_raw: &str,
        profile: RegistrationProfile,
    ) -> DomainResult<IssueResult> {
        let email = EmailAddress::parse(email_raw)?;

        let account = self
            .accounts
            .find_by_email(email.as_str())
            .await?
            .ok_or(EnrollmentError::AccountNotFound)?;
        if account.is_activated() {
            tracing::warn!(
                email = email.as_str(),
                event = "registration_conflict",
                "Registration attempted for an already activated account"
            );
            return Err(EnrollmentError::AlreadyActivated.into());
        }

        self.issue(email, StagedPayload::Register(profile), false)
            .await
    }

    /// Start the password reset flow for an activated account.
    pub async fn start_reset(&self, email_raw: &str) -> DomainResult<IssueResult> {
        let email = EmailAddress::parse(email_raw)?;

        let account = self
            .accounts
            .find_by_email(email.as_str())
            .await?
            .ok_or(EnrollmentError::AccountNotFound)?;
        if !account.is_activated() {
            return Err(EnrollmentError::NotYetActivated.into());
        }

        self.issue(email, StagedPayload::Reset, false).await
    }

    /// Resend a passcode, gated by the per-email throttle.
    ///
    /// The read-check-write sequence is retried around the store's
    /// conditional write so two near-simultaneous resends cannot both slip
    /// past the cap.
    pub async fn resend(&self, email_raw: &str, mode: FlowMode) -> DomainResult<IssueResult> {
        let email = EmailAddress::parse(email_raw)?;

        for _ in 0..RESEND_WRITE_RETRIES {
            let now = self.now().await?;

            let (record, expected) = match self.otps.find_by_email(email.as_str()).await? {
                None => {
                    // Degenerate first issuance; count starts at 1
                    let staged = self.staged_for_mode(&email, mode).await?;
                    let mut record = OtpRecord::issue(
                        email.clone(),
                        staged,
                        now,
                        self.config.otp_expiry_minutes,
                    );
                    record.resend_count = 1;
                    record.last_resend_at = Some(now);
                    (record, None)
                }
                Some(previous) => {
                    let expected = previous.resend_count;
                    let mut record = previous;

                    if record.resend_count >= self.config.resend_max {
                        let last = record.last_resend_at.unwrap_or(record.created_at);
                        let cooldown_end =
                            last + Duration::minutes(self.config.resend_cooldown_minutes);
                        if now < cooldown_end {
                            let wait_minutes = ((cooldown_end - now).num_seconds() + 59) / 60;
                            tracing::warn!(
                                email = email.as_str(),
                                wait_minutes,
                                event = "resend_throttled",
                                "Resend limit reached for email"
                            );
                            return Err(EnrollmentError::ResendLimitExceeded { wait_minutes }
                                .into());
                        }
                        // Cooldown fully elapsed; treat as a fresh window
                        record.resend_count = 0;
                        record.last_resend_at = None;
                        tracing::info!(
                            email = email.as_str(),
                            event = "resend_window_reset",
                            "Resend cooldown elapsed, counter reset"
                        );
                    }

                    record.regenerate(now, self.config.otp_expiry_minutes);
                    record.resend_count += 1;
                    record.last_resend_at = Some(now);
                    (record, Some(expected))
                }
            };

            if self.otps.upsert_checked(record.clone(), expected).await? {
                tracing::info!(
                    email = email.as_str(),
                    resend_count = record.resend_count,
                    event = "otp_resent",
                    "Regenerated passcode on resend"
                );
                let message_id = self.dispatch(&record, true).await?;
                return Ok(IssueResult { record, message_id });
            }

            tracing::warn!(
                email = email.as_str(),
                event = "resend_write_conflict",
                "Concurrent resend detected, re-evaluating throttle"
            );
        }

        Err(DomainError::Internal {
            message: "Resend write contention persisted across retries".to_string(),
        })
    }

    /// Verify a submitted passcode. Pure read: the record is never mutated,
    /// so a still-valid code verifies repeatedly until it expires or is
    /// consumed by finalization. That idempotent-read behavior is intended.
    pub async fn verify(&self, email_raw: &str, submitted_code: &str) -> DomainResult<VerifiedFlow> {
        let email = EmailAddress::parse(email_raw)?;
        let now = self.now().await?;

        let record = self
            .otps
            .find_by_email(email.as_str())
            .await?
            .ok_or(EnrollmentError::OtpNotFound)?;

        if record.is_expired(now) {
            tracing::info!(
                email = email.as_str(),
                event = "otp_expired",
                "Verification attempted with an expired passcode"
            );
            return Err(EnrollmentError::OtpExpired.into());
        }

        if !record.matches(submitted_code) {
            tracing::warn!(
                email = email.as_str(),
                event = "otp_mismatch",
                "Verification attempted with an incorrect passcode"
            );
            return Err(EnrollmentError::CodeMismatch.into());
        }

        tracing::info!(
            email = email.as_str(),
            event = "otp_verified",
            "Passcode verified"
        );
        Ok(VerifiedFlow {
            email: email.into_string(),
            mode: record.staged.mode(),
        })
    }

    /// Consume a verified staging record into a credential change.
    ///
    /// Expiry is not re-checked here: freshness is enforced by the verify
    /// step, and routing guarantees finalize is only reachable after it.
    pub async fn finalize(
        &self,
        email_raw: &str,
        password: &str,
        confirm_password: &str,
        mode: FlowMode,
    ) -> DomainResult<FinalizeOutcome> {
        if password != confirm_password {
            return Err(EnrollmentError::PasswordMismatch.into());
        }
        if !is_strong_password(password) {
            return Err(EnrollmentError::WeakPassword.into());
        }

        let email = EmailAddress::parse(email_raw)?;
        let record = self
            .otps
            .find_by_email(email.as_str())
            .await?
            .ok_or(EnrollmentError::OtpNotFound)?;

        // A staged payload for the wrong flow is as good as no payload
        if record.staged.mode() != mode {
            return Err(EnrollmentError::OtpNotFound.into());
        }

        let hash = self.hasher.hash(password).map_err(|e| {
            tracing::error!(error = %e, event = "hash_failed", "Password hashing failed");
            DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            }
        })?;

        let updated = match &record.staged {
            StagedPayload::Register(profile) => {
                self.accounts
                    .activate(email.as_str(), profile, &hash)
                    .await?
            }
            StagedPayload::Reset => self.accounts.reset_password(email.as_str(), &hash).await?,
        };
        if !updated {
            tracing::error!(
                email = email.as_str(),
                event = "finalize_no_account",
                "Finalization found no account row to update"
            );
            return Err(EnrollmentError::AccountNotFound.into());
        }

        // Consume the flow. A failed delete is non-fatal: the stale record
        // expires on its own.
        match self.otps.delete(email.as_str()).await {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    email = email.as_str(),
                    error = %e,
                    event = "otp_cleanup_failed",
                    "Failed to delete consumed OTP record"
                );
            }
        }

        let outcome = match mode {
            FlowMode::Register => FinalizeOutcome::AccountActivated,
            FlowMode::Reset => FinalizeOutcome::PasswordReset,
        };
        tracing::info!(
            email = email.as_str(),
            mode = mode.as_str(),
            event = "enrollment_finalized",
            "Credential change persisted"
        );
        Ok(outcome)
    }

    /// Generate, persist, and dispatch a passcode.
    ///
    /// The record is written before delivery is attempted, and is not
    /// rolled back on delivery failure: the code is real and usable even if
    /// the caller never learns whether the mail arrived.
    async fn issue(
        &self,
        email: EmailAddress,
        staged: StagedPayload,
        resent: bool,
    ) -> DomainResult<IssueResult> {
        let now = self.now().await?;
        let record = OtpRecord::issue(email, staged, now, self.config.otp_expiry_minutes);

        self.otps.upsert(record.clone()).await?;
        tracing::info!(
            email = record.email.as_str(),
            expires_at = %record.expires_at,
            event = "otp_generated",
            "Issued new passcode"
        );

        let message_id = self.dispatch(&record, resent).await?;
        Ok(IssueResult { record, message_id })
    }

    async fn dispatch(&self, record: &OtpRecord, resent: bool) -> DomainResult<String> {
        self.mail
            .send_otp(
                &record.email,
                &record.code,
                self.config.otp_expiry_minutes,
                resent,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    email = record.email.as_str(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Mail delivery failed; stored passcode remains valid"
                );
                EnrollmentError::DeliveryFailure.into()
            })
    }

    /// Preconditions and staged payload for a resend that has no record to
    /// refresh. Register mode stages the profile held on the pre-provisioned
    /// account row.
    async fn staged_for_mode(
        &self,
        email: &EmailAddress,
        mode: FlowMode,
    ) -> DomainResult<StagedPayload> {
        let account = self
            .accounts
            .find_by_email(email.as_str())
            .await?
            .ok_or(EnrollmentError::AccountNotFound)?;

        match mode {
            FlowMode::Register => {
                if account.is_activated() {
                    Err(EnrollmentError::AlreadyActivated.into())
                } else {
                    Ok(StagedPayload::Register(account.profile()))
                }
            }
            FlowMode::Reset => {
                if account.is_activated() {
                    Ok(StagedPayload::Reset)
                } else {
                    Err(EnrollmentError::NotYetActivated.into())
                }
            }
        }
    }

    async fn now(&self) -> DomainResult<chrono::DateTime<chrono::Utc>> {
        self.clock.now().await.map_err(|e| {
            tracing::error!(error = %e, event = "clock_unavailable", "Server clock read failed");
            EnrollmentError::ClockUnavailable.into()
        })
    }
}
