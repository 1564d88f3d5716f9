//! Value objects used across the domain.

pub mod email;

pub use email::EmailAddress;
