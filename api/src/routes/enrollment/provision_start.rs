//! Handler for POST /provision-start

use actix_web::{web, HttpResponse};
use validator::Validate;

use itsp_core::domain::entities::otp_record::{FlowMode, RegistrationProfile};
use itsp_core::repositories::{AccountRepository, OtpRepository};
use itsp_core::services::{ClockSource, MailSenderTrait, PasswordHasherTrait};

use crate::dto::{ErrorResponse, IssueResponse, ProvisionStartRequest};
use crate::handlers::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Start an enrollment flow by issuing a passcode.
///
/// For `mode=register` the form carries the profile fields to stage; for
/// `mode=reset` only the email matters. On success the client is pointed
/// at the verification prompt.
pub async fn provision_start<A, O, M, K, H>(
    state: web::Data<AppState<A, O, M, K, H>>,
    form: web::Form<ProvisionStartRequest>,
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

    let result = match mode {
        FlowMode::Register => {
            let profile = RegistrationProfile {
                name: form.name.trim().to_string(),
                school: form.school.trim().to_string(),
                department: form.department.trim().to_string(),
                faculty: form.faculty.trim().to_string(),
                phone: form.phone.trim().to_string(),
            };
            if profile.name.is_empty() || profile.school.is_empty() {
                return HttpResponse::BadRequest().json(ErrorResponse::new(
                    "VALIDATION_ERROR",
                    "Name and school are required for registration",
                ));
            }
            state
                .enrollment_service
                .start_registration(&form.email, profile)
                .await
        }
        FlowMode::Reset => state.enrollment_service.start_reset(&form.email).await,
    };

    match result {
        Ok(issued) => HttpResponse::Ok().json(IssueResponse {
            message: "OTP sent to your email".to_string(),
            redirect: format!(
                "/verify?email={}&mode={}",
                issued.record.email,
                mode.as_str()
            ),
            expires_in_minutes: state.enrollment_service.config().otp_expiry_minutes,
        }),
        Err(error) => handle_domain_error(error),
    }
}
