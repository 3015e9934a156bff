//! Adoption workflow core for the street-paws shelter platform.
//!
//! The crate carries both halves of the adoption workflow: the authority side (services,
//! repositories, and axum routers that decide request status and accept follow-up reports)
//! and the consumer side (`client`) that talks to those routes with a bearer token.

pub mod auth;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
