//! Domain models for the check-in backend.

pub mod attendee;
pub mod audit_log;
pub mod check_in;
pub mod portal;

pub use attendee::Attendee;
pub use audit_log::{AuditAction, AuditLog};
pub use check_in::{CheckIn, Coordinates};
pub use portal::{Portal, RecurrencePattern};
