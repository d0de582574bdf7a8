//! Shared utilities and common types for the check-in backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Great-circle distance math for geofencing
//! - Clock helpers for day-scoped admission logic
//! - Common validation logic

pub mod clock;
pub mod geo;
pub mod validation;
