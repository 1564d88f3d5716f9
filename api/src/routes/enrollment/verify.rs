//! Handlers for GET and POST /verify

use actix_web::{web, HttpResponse};
use validator::Validate;

use itsp_core::repositories::{AccountRepository, OtpRepository};
use itsp_core::services::{ClockSource, MailSenderTrait, PasswordHasherTrait};

use crate::dto::{FlowQuery, VerifyRequest, VerifyResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Render (as JSON) the verification prompt for a pending flow.
pub async fn verify_prompt(query: web::Query<FlowQuery>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "prompt": "Enter the 6-digit code sent to your email",
        "email": query.email,
        "mode": query.mode,
        "submit": "/verify",
        "resend": "/resend",
    }))
}

/// Check a submitted passcode against the pending record.
///
/// A pure read: the record is left untouched whatever the outcome, so the
/// user can retry a mistyped code without restarting the flow.
pub async fn verify_submit<A, O, M, K, H>(
    state: web::Data<AppState<A, O, M, K, H>>,
    form: web::Form<VerifyRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    O: OtpRepository + 'static,
    M: MailSenderTrait + 'static,
    K: ClockSource + 'static,
    H: PasswordHasherTrait + 'static,
{
    if let Err(errors) = form.validate() {
        return handle_validation_errors(errors);
    }

    // Whitespace from the entry form is not part of the code
    match state
        .enrollment_service
        .verify(&form.email, form.code.trim())
        .await
    {
        Ok(flow) => HttpResponse::Ok().json(VerifyResponse {
            message: "Code verified".to_string(),
            redirect: format!("/finalize?email={}&mode={}", flow.email, flow.mode.as_str()),
        }),
        Err(error) => handle_domain_error(error),
    }
}
