//! DTOs for the enrollment endpoints.
//!
//! `mode` travels as a plain string ("register" or "reset") and is parsed
//! leniently; an unknown value falls back to register, matching the flow
//! the forms default to. Passwords are accepted here and never serialized
//! back out.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProvisionStartRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// "register" or "reset"
    pub mode: String,

    // Profile fields, required when mode is "register"
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// 6-digit passcode as entered by the user
    #[validate(length(min = 1, max = 12))]
    pub code: String,

    pub mode: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    pub mode: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FinalizeRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 128))]
    pub confirm_password: String,

    pub mode: String,
}

/// Query string for the GET prompt endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct FlowQuery {
    pub email: String,
    #[serde(default)]
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueResponse {
    pub message: String,
    /// Where the client should navigate next
    pub redirect: String,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub message: String,
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendResponse {
    pub message: String,
    pub resend_count: i32,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeResponse {
    pub message: String,
    pub redirect: String,
}

/// Generic error body with a stable machine-readable code
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_minutes: Option<i64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            wait_minutes: None,
        }
    }

    pub fn with_wait(mut self, wait_minutes: i64) -> Self {
        self.wait_minutes = Some(wait_minutes);
        self
    }
}
