//! In-memory implementation of AccountRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::RegistrationProfile;
use crate::domain::entities::supervisor::SupervisorAccount;
use crate::errors::DomainError;

use super::trait_::AccountRepository;

/// Mock account repository for testing
#[derive(Clone, Default)]
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<String, SupervisorAccount>>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pre-provisioned account, as the administrative process would.
    pub async fn insert(&self, account: SupervisorAccount) {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.email.clone(), account);
    }

    pub async fn get(&self, email: &str) -> Option<SupervisorAccount> {
        self.accounts.read().await.get(email).cloned()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<SupervisorAccount>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(email).cloned())
    }

    async fn activate(
        &self,
        email: &str,
        profile: &RegistrationProfile,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(email) {
            Some(account) => {
                account.name = profile.name.clone();
                account.school = profile.school.clone();
                account.department = profile.department.clone();
                account.faculty = profile.faculty.clone();
                account.phone = profile.phone.clone();
                account.password_hash = Some(password_hash.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_password(&self, email: &str, password_hash: &str) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(email) {
            Some(account) => {
                account.password_hash = Some(password_hash.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioned() -> SupervisorAccount {
        SupervisorAccount {
            email: "a@uni.edu".to_string(),
            name: "Jane Doe".to_string(),
            school: "School of Computing".to_string(),
            department: "Computer Science".to_string(),
            faculty: "Science".to_string(),
            phone: "08012345678".to_string(),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn test_activate_writes_profile_and_hash() {
        let repo = MockAccountRepository::new();
        repo.insert(provisioned()).await;

        let profile = RegistrationProfile {
            name: "Jane D. Doe".to_string(),
            school: "School of Computing".to_string(),
            department: "Software Engineering".to_string(),
            faculty: "Science".to_string(),
            phone: "08087654321".to_string(),
        };

        assert!(repo.activate("a@uni.edu", &profile, "$2b$12$h").await.unwrap());

        let account = repo.get("a@uni.edu").await.unwrap();
        assert!(account.is_activated());
        assert_eq!(account.department, "Software Engineering");
    }

    #[tokio::test]
    async fn test_writes_report_missing_account() {
        let repo = MockAccountRepository::new();
        let profile = provisioned().profile();

        assert!(!repo.activate("nobody@uni.edu", &profile, "h").await.unwrap());
        assert!(!repo.reset_password("nobody@uni.edu", "h").await.unwrap());
    }
}
