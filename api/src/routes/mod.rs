//! HTTP route handlers

pub mod enrollment;

pub use enrollment::AppState;
