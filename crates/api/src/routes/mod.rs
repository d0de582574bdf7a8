//! HTTP route handlers.

pub mod attendees;
pub mod audit_logs;
pub mod check_ins;
pub mod health;
pub mod portals;
