//! Handler for POST /resend

use actix_web::{web, HttpResponse};
use validator::Validate;

use itsp_core::domain::entities::otp_record::FlowMode;
use itsp_core::repositories::{AccountRepository, OtpRepository};
use itsp_core::services::{ClockSource, MailSenderTrait, PasswordHasherTrait};

use crate::dto::{ResendRequest, ResendResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Resend a passcode, subject to the per-email throttle.
pub async fn resend<A, O, M, K, H>(
    state: web::Data<AppState<A, O, M, K, H>>,
    form: web::Form<ResendRequest>,
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

    match state.enrollment_service.resend(&form.email, mode).await {
        Ok(issued) => HttpResponse::Ok().json(ResendResponse {
            message: "OTP resent to your email".to_string(),
            resend_count: issued.record.resend_count,
            expires_in_minutes: state.enrollment_service.config().otp_expiry_minutes,
        }),
        Err(error) => handle_domain_error(error),
    }
}
