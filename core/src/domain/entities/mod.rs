//! Domain entities representing core business objects.

pub mod otp_record;
pub mod supervisor;

// Re-export commonly used types
pub use otp_record::{
    FlowMode, OtpRecord, RegistrationProfile, StagedPayload, CODE_LENGTH, DEFAULT_EXPIRY_MINUTES,
};
pub use supervisor::SupervisorAccount;
