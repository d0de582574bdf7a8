//! Domain layer for the check-in backend.
//!
//! This crate contains:
//! - Domain models (Portal, Attendee, CheckIn, AuditLog)
//! - The admission policy services (eligibility, geofencing)

pub mod models;
pub mod services;
