//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits defined in
//! `itsp_core`, backed by external services:
//!
//! - **Database**: Postgres repositories and connection pooling via SQLx
//! - **Mail**: SMTP delivery through lettre, plus a console mock for
//!   development
//! - **Clock**: server-authoritative time sources (database clock and
//!   system clock)
//! - **Crypto**: bcrypt password hashing

pub mod clock;
pub mod crypto;
pub mod database;
pub mod mail;

pub use clock::{PgClock, SystemClock};
pub use crypto::BcryptPasswordHasher;
pub use database::connection::DatabasePool;
pub use database::postgres::{PgAccountRepository, PgOtpRepository};
pub use mail::{MailSender, MockMailSender, SmtpMailSender};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Mail transport error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
