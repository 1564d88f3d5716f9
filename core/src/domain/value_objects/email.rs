//! Normalized email address value object.
//!
//! All enrollment operations key their state by email, so the address is
//! normalized (trimmed, lowercased) exactly once at the boundary and carried
//! as this type afterwards. Parsing also enforces the disposable-domain
//! policy: throwaway inboxes defeat the purpose of proving control of an
//! institutional address.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::errors::EnrollmentError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Applied after lowercasing, so uppercase ranges are not needed
    Regex::new(r"^[a-z0-9!#$%&'*+/=?^_`{|}~.-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
        .expect("email regex must compile")
});

/// Domains whose inboxes are throwaway. Checked case-insensitively against
/// the domain part only.
static DISPOSABLE_DOMAINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "10minutemail.com",
        "dispostable.com",
        "fakeinbox.com",
        "getairmail.com",
        "getnada.com",
        "guerrillamail.com",
        "guerrillamail.net",
        "inboxkitten.com",
        "mail-temp.com",
        "mailcatch.com",
        "maildrop.cc",
        "mailinator.com",
        "mintemail.com",
        "mohmal.com",
        "mytemp.email",
        "sharklasers.com",
        "spam4.me",
        "tempail.com",
        "temp-mail.org",
        "tempmail.com",
        "tempmailo.com",
        "throwawaymail.com",
        "trashmail.com",
        "yopmail.com",
    ]
    .into_iter()
    .collect()
});

/// A syntactically valid, non-disposable, normalized email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalizes and validates a raw address.
    pub fn parse(raw: &str) -> Result<Self, EnrollmentError> {
        let normalized = raw.trim().to_lowercase();
        if !EMAIL_REGEX.is_match(&normalized) {
            return Err(EnrollmentError::InvalidEmail);
        }

        let domain = normalized
            .rsplit('@')
            .next()
            .ok_or(EnrollmentError::InvalidEmail)?;
        if DISPOSABLE_DOMAINS.contains(domain) {
            return Err(EnrollmentError::DisposableEmail {
                domain: domain.to_string(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or("")
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let email = EmailAddress::parse("  Supervisor@Uni.EDU ").unwrap();
        assert_eq!(email.as_str(), "supervisor@uni.edu");
        assert_eq!(email.domain(), "uni.edu");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "plain", "no@tld", "@uni.edu", "two@@uni.edu", "a b@uni.edu"] {
            assert_eq!(
                EmailAddress::parse(raw),
                Err(EnrollmentError::InvalidEmail),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_disposable_domains() {
        let err = EmailAddress::parse("user@mailinator.com").unwrap_err();
        assert_eq!(
            err,
            EnrollmentError::DisposableEmail {
                domain: "mailinator.com".to_string()
            }
        );

        // Case-insensitive on the domain part
        assert!(EmailAddress::parse("user@MAILINATOR.com").is_err());
    }

    #[test]
    fn test_display_matches_normalized_form() {
        let email = EmailAddress::parse("A@Uni.edu").unwrap();
        assert_eq!(email.to_string(), "a@uni.edu");
    }
}
