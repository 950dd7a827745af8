//! RouteRider: bus-ticket booking backend.
//!
//! Routes, bookings, simulated payments, reviews and profiles over a hosted
//! document store. Authentication belongs to an external provider; this crate
//! only verifies its tokens.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payment;
pub mod session;
pub mod validation;
