//! Password strength policy for finalization.
//!
//! Minimum 8 characters with at least one uppercase letter, one lowercase
//! letter, and one digit. No special-character requirement and no maximum
//! length.

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Checks a candidate password against the portal's strength policy.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_policy_compliant_passwords() {
        assert!(is_strong_password("Str0ngPass"));
        assert!(is_strong_password("Str0ngPass!"));
        // No maximum length
        assert!(is_strong_password(&format!("Aa1{}", "x".repeat(200))));
    }

    #[test]
    fn test_rejects_missing_character_classes() {
        assert!(!is_strong_password("alllowercase1"));
        assert!(!is_strong_password("ALLUPPERCASE1"));
        assert!(!is_strong_password("NoDigitsHere"));
    }

    #[test]
    fn test_rejects_short_passwords() {
        assert!(!is_strong_password("Aa1"));
        assert!(!is_strong_password("Aa1bcde"));
        assert!(is_strong_password("Aa1bcdef"));
    }

    #[test]
    fn test_no_special_character_requirement() {
        assert!(is_strong_password("Abcdefg1"));
    }
}
