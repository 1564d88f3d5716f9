//! Types for enrollment service results

use crate::domain::entities::otp_record::{FlowMode, OtpRecord};

/// Result of issuing or resending a passcode.
///
/// The record carries the code for test access and mail dispatch; the api
/// layer must never serialize it into a response.
#[derive(Debug, Clone)]
pub struct IssueResult {
    /// The persisted OTP record
    pub record: OtpRecord,
    /// Message id reported by the mail sender
    pub message_id: String,
}

/// Result of a successful verification: the staged-flow token the caller
/// carries into the finalize step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedFlow {
    pub email: String,
    pub mode: FlowMode,
}

/// Redirect intent returned by finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    AccountActivated,
    PasswordReset,
}
