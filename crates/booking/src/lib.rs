//! # HealthSync Booking
//!
//! The appointment booking workflow: a cascading selection of hospital,
//! department, doctor, date and slot, followed by a reservation request.
//!
//! - **State**: the selection as a tagged union, so a doctor can never be
//!   chosen without a department
//! - **Fetch**: per-level request generations that discard stale responses
//! - **Slots**: how the slot list for the chosen date is presented
//! - **Controller**: [`BookingFlow`], which ties the above to the directory and
//!   reservation services

pub mod controller;
pub mod fetch;
pub mod slots;
pub mod state;

pub use controller::{BookingFlow, Controls};
pub use state::{BookingDraft, BookingState, Stage};
