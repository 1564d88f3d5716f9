//! # API Layer
//!
//! actix-web HTTP surface for the credential issuance service. Handlers
//! translate form posts into calls on the enrollment service from
//! `itsp_core` and map domain errors to stable JSON error responses.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
