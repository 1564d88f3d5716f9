use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;

use itsp_api::app::create_app;
use itsp_api::config::ApiConfig;
use itsp_api::routes::AppState;
use itsp_core::services::EnrollmentService;
use itsp_infra::crypto::BcryptPasswordHasher;
use itsp_infra::database::connection::{DatabaseConfig, DatabasePool};
use itsp_infra::database::postgres::{PgAccountRepository, PgOtpRepository};
use itsp_infra::mail::{MailSender, MockMailSender, SmtpConfig, SmtpMailSender};
use itsp_infra::clock::PgClock;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting ITSP credential service");

    let config = ApiConfig::from_env()?;

    let db = DatabasePool::new(DatabaseConfig {
        url: config.database_url.clone(),
        ..DatabaseConfig::default()
    })
    .await?;
    db.health_check().await?;

    let pool = db.get_pool().clone();
    let accounts = Arc::new(PgAccountRepository::new(pool.clone()));
    let otps = Arc::new(PgOtpRepository::new(pool.clone()));

    // Expiry and cooldown arithmetic uses the database clock so that all
    // server instances agree on what "now" means
    let clock = Arc::new(PgClock::new(pool));

    let mail = Arc::new(if config.use_mock_mail {
        info!("Mail delivery routed to the console mock");
        MailSender::Mock(MockMailSender::new())
    } else {
        MailSender::Smtp(SmtpMailSender::new(SmtpConfig {
            host: config.smtp_host.clone(),
            username: config.smtp_user.clone(),
            password: config.smtp_pass.clone(),
            from: config.mail_from.clone(),
        })?)
    });

    let hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));

    let enrollment_service = Arc::new(EnrollmentService::new(
        accounts,
        otps,
        mail,
        clock,
        hasher,
        config.enrollment.clone(),
    ));

    let app_state = web::Data::new(AppState { enrollment_service });

    let bind_address = config.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await?;

    Ok(())
}
