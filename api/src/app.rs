//! Application factory
//!
//! Builds the actix-web App with all routes and shared state. Generic over
//! the service's collaborators so integration tests can wire in mocks.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use itsp_core::repositories::{AccountRepository, OtpRepository};
use itsp_core::services::{ClockSource, MailSenderTrait, PasswordHasherTrait};

use crate::routes::enrollment::{
    finalize::{finalize_prompt, finalize_submit},
    provision_start::provision_start,
    resend::resend,
    verify::{verify_prompt, verify_submit},
    AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<A, O, M, K, H>(
    app_state: web::Data<AppState<A, O, M, K, H>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    A: AccountRepository + 'static,
    O: OtpRepository + 'static,
    M: MailSenderTrait + 'static,
    K: ClockSource + 'static,
    H: PasswordHasherTrait + 'static,
{
    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check))
        .route(
            "/provision-start",
            web::post().to(provision_start::<A, O, M, K, H>),
        )
        .route("/verify", web::get().to(verify_prompt))
        .route("/verify", web::post().to(verify_submit::<A, O, M, K, H>))
        .route("/resend", web::post().to(resend::<A, O, M, K, H>))
        .route("/finalize", web::get().to(finalize_prompt))
        .route(
            "/finalize",
            web::post().to(finalize_submit::<A, O, M, K, H>),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "itsp-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "NOT_FOUND",
        "message": "The requested resource was not found"
    }))
}
