//! One-time-passcode record for email-based account enrollment.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::email::EmailAddress;

/// Length of the passcode
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for passcodes (10 minutes)
pub const DEFAULT_EXPIRY_MINUTES: i64 = 10;

/// Which onboarding flow an enrollment step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    Register,
    Reset,
}

impl FlowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowMode::Register => "register",
            FlowMode::Reset => "reset",
        }
    }

    /// Parse a mode string from a request; unknown values fall back to
    /// `Register`, matching the original form defaults.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "reset" => FlowMode::Reset,
            _ => FlowMode::Register,
        }
    }
}

impl Default for FlowMode {
    fn default() -> Self {
        FlowMode::Register
    }
}

/// Profile fields captured before identity is proven, applied to the
/// account on first activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProfile {
    pub name: String,
    pub school: String,
    pub department: String,
    pub faculty: String,
    pub phone: String,
}

/// Data held pending verification, tagged by the flow that staged it.
///
/// Finalization pattern-matches on the variant instead of trusting field
/// presence in an untyped bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StagedPayload {
    Register(RegistrationProfile),
    Reset,
}

impl StagedPayload {
    pub fn mode(&self) -> FlowMode {
        match self {
            StagedPayload::Register(_) => FlowMode::Register,
            StagedPayload::Reset => FlowMode::Reset,
        }
    }
}

/// One-time-passcode record, at most one per email address.
///
/// Issuance creates it, resend mutates it in place, verification reads it
/// without side effects, and successful finalization deletes it. Abandoned
/// records are left to expire; no eager cleanup is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized email address, the unique key
    pub email: String,

    /// The 6-digit passcode, fixed width with leading zeros preserved
    pub code: String,

    /// Timestamp past which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Flow data carried across requests until finalization
    pub staged: StagedPayload,

    /// Number of resend requests since issuance (or since the last
    /// cooldown reset)
    pub resend_count: i32,

    /// Timestamp of the most recent resend, if any
    pub last_resend_at: Option<DateTime<Utc>>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a fresh record with a random code and the given expiry,
    /// relative to the caller-supplied server time.
    pub fn issue(
        email: EmailAddress,
        staged: StagedPayload,
        now: DateTime<Utc>,
        expiry_minutes: i64,
    ) -> Self {
        Self {
            email: email.into_string(),
            code: Self::generate_code(),
            expires_at: now + Duration::minutes(expiry_minutes),
            staged,
            resend_count: 0,
            last_resend_at: None,
            created_at: now,
        }
    }

    /// Generates a uniformly random 6-digit code using the OS CSPRNG.
    ///
    /// The code is kept as a fixed-width string so that leading zeros are
    /// preserved and the space is not biased toward higher values.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 4];
        rng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes);
        // Modulo bias over 2^32 / 10^6 is negligible for this use
        format!("{:06}", num % 1_000_000)
    }

    /// Checks whether the code has expired at the given server time.
    ///
    /// Strict greater-than: a comparison at exactly `expires_at` still
    /// counts as valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Constant-time comparison of a submitted code against the stored one.
    pub fn matches(&self, submitted: &str) -> bool {
        if submitted.len() != self.code.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Replaces the code and pushes the expiry forward, as a resend does.
    pub fn regenerate(&mut self, now: DateTime<Utc>, expiry_minutes: i64) {
        self.code = Self::generate_code();
        self.expires_at = now + Duration::minutes(expiry_minutes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_email() -> EmailAddress {
        EmailAddress::parse("supervisor@uni.edu").unwrap()
    }

    #[test]
    fn test_issue_defaults() {
        let now = Utc::now();
        let record = OtpRecord::issue(test_email(), StagedPayload::Reset, now, 10);

        assert_eq!(record.email, "supervisor@uni.edu");
        assert_eq!(record.code.len(), CODE_LENGTH);
        assert_eq!(record.resend_count, 0);
        assert!(record.last_resend_at.is_none());
        assert_eq!(record.expires_at, now + Duration::minutes(10));
        assert!(!record.is_expired(now));
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = OtpRecord::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let num: u32 = code.parse().expect("code should be numeric");
            assert!(num < 1_000_000);
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: Vec<String> = (0..100).map(|_| OtpRecord::generate_code()).collect();
        let unique = codes.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique > 1);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let record = OtpRecord::issue(test_email(), StagedPayload::Reset, now, 10);

        // Exactly at expires_at the code is still valid
        assert!(!record.is_expired(record.expires_at));
        // One second past it is not
        assert!(record.is_expired(record.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_matches_is_exact() {
        let now = Utc::now();
        let record = OtpRecord::issue(test_email(), StagedPayload::Reset, now, 10);

        assert!(record.matches(&record.code));
        assert!(!record.matches("0"));
        assert!(!record.matches(&format!(" {}", record.code)));
    }

    #[test]
    fn test_regenerate_replaces_code_and_expiry() {
        let now = Utc::now();
        let mut record = OtpRecord::issue(test_email(), StagedPayload::Reset, now, 10);
        let original_code = record.code.clone();

        let later = now + Duration::minutes(3);
        record.regenerate(later, 10);

        assert_ne!(record.code, original_code);
        assert_eq!(record.expires_at, later + Duration::minutes(10));
    }

    #[test]
    fn test_staged_payload_serde_tags_mode() {
        let staged = StagedPayload::Register(RegistrationProfile {
            name: "Jane Doe".to_string(),
            school: "School of Computing".to_string(),
            department: "Computer Science".to_string(),
            faculty: "Science".to_string(),
            phone: "08012345678".to_string(),
        });

        let json = serde_json::to_value(&staged).unwrap();
        assert_eq!(json["mode"], "register");
        assert_eq!(json["name"], "Jane Doe");

        let back: StagedPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, staged);
        assert_eq!(back.mode(), FlowMode::Register);

        let reset = serde_json::to_value(&StagedPayload::Reset).unwrap();
        assert_eq!(reset["mode"], "reset");
    }

    #[test]
    fn test_flow_mode_parse_defaults_to_register() {
        assert_eq!(FlowMode::parse_or_default("reset"), FlowMode::Reset);
        assert_eq!(FlowMode::parse_or_default("register"), FlowMode::Register);
        assert_eq!(FlowMode::parse_or_default(""), FlowMode::Register);
        assert_eq!(FlowMode::parse_or_default("garbage"), FlowMode::Register);
    }
}
