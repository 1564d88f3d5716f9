//! Supervisor account entity.
//!
//! Accounts are pre-provisioned by an administrative process outside this
//! subsystem; the enrollment flow only ever sets the password hash (and, on
//! first activation, the profile fields). Accounts are never deleted here.

use serde::{Deserialize, Serialize};

use super::otp_record::RegistrationProfile;

/// A supervisor account row, keyed by normalized email.
///
/// A missing password hash means "provisioned but not yet activated".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorAccount {
    pub email: String,
    pub name: String,
    pub school: String,
    pub department: String,
    pub faculty: String,
    pub phone: String,

    /// One-way hash of the password; `None` until self-service activation
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
}

impl SupervisorAccount {
    pub fn is_activated(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Profile fields as staged payload material, used when a resend has to
    /// degenerate into a first issuance.
    pub fn profile(&self) -> RegistrationProfile {
        RegistrationProfile {
            name: self.name.clone(),
            school: self.school.clone(),
            department: self.department.clone(),
            faculty: self.faculty.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(hash: Option<&str>) -> SupervisorAccount {
        SupervisorAccount {
            email: "supervisor@uni.edu".to_string(),
            name: "Jane Doe".to_string(),
            school: "School of Computing".to_string(),
            department: "Computer Science".to_string(),
            faculty: "Science".to_string(),
            phone: "08012345678".to_string(),
            password_hash: hash.map(String::from),
        }
    }

    #[test]
    fn test_activation_state() {
        assert!(!account(None).is_activated());
        assert!(account(Some("$2b$12$hash")).is_activated());
    }

    #[test]
    fn test_hash_never_serialized() {
        let json = serde_json::to_value(account(Some("$2b$12$hash"))).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_profile_extraction() {
        let profile = account(None).profile();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.department, "Computer Science");
    }
}
