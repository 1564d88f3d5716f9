//! Environment-driven configuration.
//!
//! All knobs come from environment variables (a `.env` file is honored in
//! development). Parse failures on numeric values are reported rather than
//! silently replaced so a typo in deployment config is caught at startup.

use std::env;

use itsp_core::services::EnrollmentConfig;
use itsp_infra::crypto::DEFAULT_BCRYPT_COST;

/// Top-level API configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Postgres connection URL
    pub database_url: String,
    /// Bind host
    pub server_host: String,
    /// Bind port
    pub server_port: u16,
    /// Passcode and throttle knobs passed to the enrollment service
    pub enrollment: EnrollmentConfig,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// SMTP relay settings; unused when `use_mock_mail` is set
    pub smtp_host: String,
    pub smtp_user: String,
    pub smtp_pass: String,
    /// From address for outgoing mail
    pub mail_from: String,
    /// Route mail to the console mock instead of SMTP
    pub use_mock_mail: bool,
}

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional_parsed<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let use_mock_mail = env::var("USE_MOCK_MAIL")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let defaults = EnrollmentConfig::default();

        let config = Self {
            database_url: required("DATABASE_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: optional_parsed("SERVER_PORT", 8080)?,
            enrollment: EnrollmentConfig {
                otp_expiry_minutes: optional_parsed(
                    "OTP_EXPIRY_MINUTES",
                    defaults.otp_expiry_minutes,
                )?,
                resend_max: optional_parsed("RESEND_MAX", defaults.resend_max)?,
                resend_cooldown_minutes: optional_parsed(
                    "RESEND_COOLDOWN_MINUTES",
                    defaults.resend_cooldown_minutes,
                )?,
            },
            bcrypt_cost: optional_parsed("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_user: env::var("SMTP_USER").unwrap_or_default(),
            smtp_pass: env::var("SMTP_PASS").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM").unwrap_or_default(),
            use_mock_mail,
        };

        if !config.use_mock_mail && config.smtp_host.is_empty() {
            return Err(ConfigError::Missing("SMTP_HOST"));
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
