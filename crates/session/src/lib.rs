//! # HealthSync Session
//!
//! Holds the authenticated user and bearer token. The booking flow only ever
//! sees a read-only [`SessionHandle`]; persistence goes through a
//! [`store::SessionStore`] adapter.

pub mod provider;
pub mod store;

pub use provider::{SessionHandle, SessionProvider};
