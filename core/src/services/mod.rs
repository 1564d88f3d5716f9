//! Business services containing domain logic and use cases.

pub mod enrollment;

// Re-export commonly used types
pub use enrollment::{
    ClockSource, EnrollmentConfig, EnrollmentService, FinalizeOutcome, IssueResult,
    MailSenderTrait, PasswordHasherTrait, VerifiedFlow,
};
