//! Unit tests for the resend throttle state machine

use chrono::Duration;

use crate::domain::entities::otp_record::FlowMode;
use crate::errors::{DomainError, EnrollmentError};
use crate::repositories::OtpRepository;
use crate::services::enrollment::config::EnrollmentConfig;

use super::mocks::{activated_account, harness, provisioned_account};

const EMAIL: &str = "a@x.com";

#[tokio::test]
async fn test_first_three_resends_increment_counter() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(activated_account(EMAIL)).await;
    h.service.start_reset(EMAIL).await.unwrap();

    for expected in 1..=3 {
        let result = h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();
        assert_eq!(result.record.resend_count, expected);
        assert_eq!(result.record.last_resend_at, Some(h.clock.current()));
    }
}

#[tokio::test]
async fn test_resend_regenerates_code_and_expiry() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(activated_account(EMAIL)).await;
    let issued = h.service.start_reset(EMAIL).await.unwrap();

    h.clock.advance(Duration::minutes(2));
    let resent = h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();

    assert_ne!(resent.record.code, issued.record.code);
    assert_eq!(
        resent.record.expires_at,
        h.clock.current() + Duration::minutes(10)
    );
    // The old code was invalidated in place
    let err = h.service.verify(EMAIL, &issued.record.code).await.unwrap_err();
    match err {
        DomainError::Enrollment(EnrollmentError::CodeMismatch) => {}
        other => panic!("expected mismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fourth_resend_within_cooldown_is_rejected() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(activated_account(EMAIL)).await;
    h.service.start_reset(EMAIL).await.unwrap();

    for _ in 0..3 {
        h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();
    }
    let sends_before = h.mail.sends();

    h.clock.advance(Duration::minutes(5));
    let err = h.service.resend(EMAIL, FlowMode::Reset).await.unwrap_err();
    match err {
        DomainError::Enrollment(EnrollmentError::ResendLimitExceeded { wait_minutes }) => {
            assert!(wait_minutes > 0 && wait_minutes <= 30, "got {wait_minutes}");
            assert_eq!(wait_minutes, 25);
        }
        other => panic!("expected rate limit, got {:?}", other),
    }

    // Rejection mutates nothing and sends nothing
    assert_eq!(h.mail.sends(), sends_before);
    assert_eq!(h.otps.get(EMAIL).await.unwrap().resend_count, 3);
}

#[tokio::test]
async fn test_wait_estimate_rounds_up_to_whole_minutes() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(activated_account(EMAIL)).await;
    h.service.start_reset(EMAIL).await.unwrap();
    for _ in 0..3 {
        h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();
    }

    // 29m30s remaining rounds up to 30
    h.clock.advance(Duration::seconds(30));
    match h.service.resend(EMAIL, FlowMode::Reset).await.unwrap_err() {
        DomainError::Enrollment(EnrollmentError::ResendLimitExceeded { wait_minutes }) => {
            assert_eq!(wait_minutes, 30);
        }
        other => panic!("expected rate limit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resend_after_cooldown_resets_counter() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(activated_account(EMAIL)).await;
    h.service.start_reset(EMAIL).await.unwrap();
    for _ in 0..3 {
        h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();
    }

    h.clock.advance(Duration::minutes(31));
    let result = h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();

    // The elapsed window resets the counter; this call is resend number 1
    assert_eq!(result.record.resend_count, 1);
    assert_eq!(result.record.last_resend_at, Some(h.clock.current()));
}

#[tokio::test]
async fn test_resend_without_record_degenerates_to_first_issuance() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(provisioned_account(EMAIL)).await;

    let result = h.service.resend(EMAIL, FlowMode::Register).await.unwrap();
    assert_eq!(result.record.resend_count, 1);

    // The staged payload is rebuilt from the pre-provisioned account row
    match &result.record.staged {
        crate::domain::entities::otp_record::StagedPayload::Register(profile) => {
            assert_eq!(profile.name, "Jane Doe");
        }
        other => panic!("expected register payload, got {:?}", other),
    }
}

#[tokio::test]
async fn test_degenerate_resend_enforces_mode_preconditions() {
    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(provisioned_account(EMAIL)).await;

    // Reset mode needs an activated account
    match h.service.resend(EMAIL, FlowMode::Reset).await.unwrap_err() {
        DomainError::Enrollment(EnrollmentError::NotYetActivated) => {}
        other => panic!("expected NotYetActivated, got {:?}", other),
    }

    // Register mode rejects unknown addresses
    match h
        .service
        .resend("nobody@x.com", FlowMode::Register)
        .await
        .unwrap_err()
    {
        DomainError::Enrollment(EnrollmentError::AccountNotFound) => {}
        other => panic!("expected AccountNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lost_conditional_write_is_reevaluated() {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use crate::domain::entities::otp_record::OtpRecord;
    use crate::repositories::MockOtpRepository;
    use crate::services::enrollment::service::EnrollmentService;

    // Wrapper that injects a competing resend between this call's read and
    // its conditional write, exactly once
    struct RacingOtpRepository {
        inner: MockOtpRepository,
        raced: AtomicBool,
    }

    #[async_trait]
    impl OtpRepository for RacingOtpRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>, DomainError> {
            self.inner.find_by_email(email).await
        }

        async fn upsert(&self, record: OtpRecord) -> Result<(), DomainError> {
            self.inner.upsert(record).await
        }

        async fn upsert_checked(
            &self,
            record: OtpRecord,
            expected_resend_count: Option<i32>,
        ) -> Result<bool, DomainError> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                if let Some(mut competing) = self.inner.get(&record.email).await {
                    competing.resend_count += 1;
                    self.inner.upsert(competing).await?;
                }
            }
            self.inner.upsert_checked(record, expected_resend_count).await
        }

        async fn delete(&self, email: &str) -> Result<bool, DomainError> {
            self.inner.delete(email).await
        }
    }

    let h = harness(EnrollmentConfig::default());
    h.accounts.insert(activated_account(EMAIL)).await;

    let otps = Arc::new(RacingOtpRepository {
        inner: MockOtpRepository::new(),
        raced: AtomicBool::new(false),
    });
    let service = EnrollmentService::new(
        h.accounts.clone(),
        otps.clone(),
        h.mail.clone(),
        h.clock.clone(),
        Arc::new(super::mocks::PlainHasher),
        EnrollmentConfig::default(),
    );

    let issued = service.start_reset(EMAIL).await.unwrap();
    assert_eq!(issued.record.resend_count, 0);

    // The first conditional write loses to the injected competitor; the
    // service re-reads and lands on top of it instead of clobbering it
    let result = service.resend(EMAIL, FlowMode::Reset).await.unwrap();
    assert_eq!(result.record.resend_count, 2);
    assert_eq!(otps.inner.get(EMAIL).await.unwrap().resend_count, 2);
}

#[tokio::test]
async fn test_custom_config_windows() {
    let config = EnrollmentConfig {
        otp_expiry_minutes: 1,
        resend_max: 1,
        resend_cooldown_minutes: 2,
    };
    let h = harness(config);
    h.accounts.insert(activated_account(EMAIL)).await;
    h.service.start_reset(EMAIL).await.unwrap();

    h.service.resend(EMAIL, FlowMode::Reset).await.unwrap();
    match h.service.resend(EMAIL, FlowMode::Reset).await.unwrap_err() {
        DomainError::Enrollment(EnrollmentError::ResendLimitExceeded { wait_minutes }) => {
            assert_eq!(wait_minutes, 2);
        }
        other => panic!("expected rate limit, got {:?}", other),
    }

    h.clock.advance(Duration::minutes(2));
    assert!(h.service.resend(EMAIL, FlowMode::Reset).await.is_ok());
}
