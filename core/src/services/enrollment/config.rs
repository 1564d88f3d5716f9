//! Configuration for the enrollment service

use crate::domain::entities::otp_record::DEFAULT_EXPIRY_MINUTES;

/// Default resend cap before the cooldown window applies
pub const DEFAULT_RESEND_MAX: i32 = 3;

/// Default cooldown window once the resend cap is reached (30 minutes)
pub const DEFAULT_RESEND_COOLDOWN_MINUTES: i64 = 30;

/// Configuration for the enrollment service.
///
/// Passed in at construction rather than read from ambient globals so tests
/// can inject tiny windows without real clock waits.
#[derive(Debug, Clone)]
pub struct EnrollmentConfig {
    /// Number of minutes before an issued passcode expires
    pub otp_expiry_minutes: i64,
    /// Number of resends allowed before the cooldown window applies
    pub resend_max: i32,
    /// Minutes a throttled email must wait after its last resend
    pub resend_cooldown_minutes: i64,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            otp_expiry_minutes: DEFAULT_EXPIRY_MINUTES,
            resend_max: DEFAULT_RESEND_MAX,
            resend_cooldown_minutes: DEFAULT_RESEND_COOLDOWN_MINUTES,
        }
    }
}
