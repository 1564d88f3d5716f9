//! Postgres-specific repository implementations
//!
//! Concrete implementations of the repository traits from `itsp_core`
//! using SQLx over Postgres.

pub mod account_repository_impl;
pub mod otp_repository_impl;

pub use account_repository_impl::PgAccountRepository;
pub use otp_repository_impl::PgOtpRepository;
