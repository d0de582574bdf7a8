//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod attendee;
pub mod audit_log;
pub mod check_in;
pub mod portal;

pub use attendee::AttendeeEntity;
pub use audit_log::AuditLogEntity;
pub use check_in::CheckInEntity;
pub use portal::PortalEntity;
