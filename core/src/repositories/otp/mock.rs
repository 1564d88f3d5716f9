//! In-memory implementation of OtpRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainError;

use super::trait_::OtpRepository;

/// Mock OTP repository backed by a shared map
#[derive(Clone, Default)]
pub struct MockOtpRepository {
    records: Arc<RwLock<HashMap<String, OtpRecord>>>,
}

impl MockOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read access for test assertions
    pub async fn get(&self, email: &str) -> Option<OtpRecord> {
        self.records.read().await.get(email).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(email).cloned())
    }

    async fn upsert(&self, record: OtpRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.insert(record.email.clone(), record);
        Ok(())
    }

    async fn upsert_checked(
        &self,
        record: OtpRecord,
        expected_resend_count: Option<i32>,
    ) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let current = records.get(&record.email).map(|r| r.resend_count);
        if current != expected_resend_count {
            return Ok(false);
        }
        records.insert(record.email.clone(), record);
        Ok(true)
    }

    async fn delete(&self, email: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(email).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::otp_record::StagedPayload;
    use crate::domain::value_objects::email::EmailAddress;
    use chrono::Utc;

    fn record() -> OtpRecord {
        OtpRecord::issue(
            EmailAddress::parse("a@uni.edu").unwrap(),
            StagedPayload::Reset,
            Utc::now(),
            10,
        )
    }

    #[tokio::test]
    async fn test_upsert_overwrites_in_place() {
        let repo = MockOtpRepository::new();
        let first = record();
        repo.upsert(first.clone()).await.unwrap();

        let mut second = record();
        second.resend_count = 2;
        repo.upsert(second).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = repo.get("a@uni.edu").await.unwrap();
        assert_eq!(stored.resend_count, 2);
        assert_ne!(stored.code, first.code);
    }

    #[tokio::test]
    async fn test_upsert_checked_detects_stale_read() {
        let repo = MockOtpRepository::new();

        // Insert-only write applies when absent, not when present
        assert!(repo.upsert_checked(record(), None).await.unwrap());
        assert!(!repo.upsert_checked(record(), None).await.unwrap());

        // Counter-guarded write applies once, then the guard is stale
        let mut bumped = record();
        bumped.resend_count = 1;
        assert!(repo.upsert_checked(bumped.clone(), Some(0)).await.unwrap());
        assert!(!repo.upsert_checked(bumped, Some(0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let repo = MockOtpRepository::new();
        repo.upsert(record()).await.unwrap();

        assert!(repo.delete("a@uni.edu").await.unwrap());
        assert!(!repo.delete("a@uni.edu").await.unwrap());
        assert!(repo.is_empty().await);
    }
}
