//! Handlers for GET and POST /finalize

use actix_web::{web, HttpResponse};
use validator::Validate;

use itsp_core::domain::entities::otp_record::FlowMode;
use itsp_core::repositories::{AccountRepository, OtpRepository};
use itsp_core::services::{
    ClockSource, FinalizeOutcome, MailSenderTrait, PasswordHasherTrait,
};

use crate::dto::{FinalizeRequest, FinalizeResponse, FlowQuery};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Render (as JSON) the password entry prompt.
pub async fn finalize_prompt(query: web::Query<FlowQuery>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "prompt": "Choose a new password",
        "email": query.email,
        "mode": query.mode,
        "submit": "/finalize",
        "requirements": "At least 8 characters with an uppercase letter, a lowercase letter, and a number",
    }))
}

/// Commit the credential and consume the pending record.
pub async fn finalize_submit<A, O, M, K, H>(
    state: web::Data<AppState<A, O, M, K, H>>,
    form: web::Form<FinalizeRequest>,
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

    let mode = FlowMode::parse_or_default(&form.mode);

    match state
        .enrollment_service
        .finalize(&form.email, &form.password, &form.confirm_password, mode)
        .await
    {
        Ok(FinalizeOutcome::AccountActivated) => HttpResponse::Ok().json(FinalizeResponse {
            message: "Account created. You can now log in".to_string(),
            redirect: "/?success=account-created".to_string(),
        }),
        Ok(FinalizeOutcome::PasswordReset) => HttpResponse::Ok().json(FinalizeResponse {
            message: "Password updated. You can now log in".to_string(),
            redirect: "/?success=password-reset".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
