//! Repository interfaces for the keyed record stores.

pub mod account;
pub mod otp;

pub use account::{AccountRepository, MockAccountRepository};
pub use otp::{MockOtpRepository, OtpRepository};
