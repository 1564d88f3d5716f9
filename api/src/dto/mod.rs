//! Request and response data transfer objects

pub mod enrollment;

pub use enrollment::*;
