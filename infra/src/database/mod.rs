//! Database module - Postgres implementations using SQLx
//!
//! Provides connection pool management and Postgres implementations of the
//! repository traits from `itsp_core`.

pub mod connection;
pub mod postgres;

pub use connection::{DatabaseConfig, DatabasePool};
pub use postgres::{PgAccountRepository, PgOtpRepository};
