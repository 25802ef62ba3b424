//! # HealthSync Core
//!
//! Shared wire models and the error type used by every HealthSync crate.

pub mod errors;
pub mod models;
