//! SMTP mail delivery via lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use itsp_core::services::MailSenderTrait;

use super::{otp_body, otp_subject};
use crate::InfrastructureError;

/// SMTP transport configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub host: String,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// From address for outgoing mail
    pub from: String,
}

/// Mail sender backed by an SMTP relay
pub struct SmtpMailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailSender {
    /// Build a pooled TLS transport from configuration.
    pub fn new(config: SmtpConfig) -> Result<Self, InfrastructureError> {
        let creds = Credentials::new(config.username, config.password);

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay: {}", e)))?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from: config.from,
        })
    }
}

#[async_trait]
impl MailSenderTrait for SmtpMailSender {
    async fn send_otp(
        &self,
        to: &str,
        code: &str,
        expiry_minutes: i64,
        resent: bool,
    ) -> Result<String, String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid recipient: {}", e))?)
            .subject(otp_subject(resent))
            .header(ContentType::TEXT_PLAIN)
            .body(otp_body(code, expiry_minutes))
            .map_err(|e| format!("Failed to build message: {}", e))?;

        let response = self.mailer.send(message).await.map_err(|e| {
            error!(recipient = %to, "SMTP delivery failed: {}", e);
            format!("SMTP delivery failed: {}", e)
        })?;

        let message_id = response.message().collect::<Vec<_>>().join(" ");

        info!(
            target: "mail_service",
            provider = "smtp",
            recipient = %to,
            resent = resent,
            "OTP mail accepted by relay"
        );

        Ok(message_id)
    }
}
