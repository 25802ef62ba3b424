//! # HealthSync Client
//!
//! Typed access to the HealthSync REST backend.
//!
//! - **Config**: environment-driven settings
//! - **Services**: the traits the rest of the workspace depends on
//! - **Http**: the `reqwest` implementation of those traits
//! - **Mock**: `mockall` doubles of every service for tests

/// Configuration loaded from the environment
pub mod config;
/// `reqwest`-backed implementation of the service traits
pub mod http;
/// Service traits for directory, reservation, auth, emergency, chatbot and records calls
pub mod services;

pub mod mock;

pub use http::ApiClient;
