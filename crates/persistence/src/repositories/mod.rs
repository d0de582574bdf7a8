//! Repository implementations for database operations.

pub mod attendee;
pub mod audit_log;
pub mod check_in;
pub mod portal;

pub use attendee::AttendeeRepository;
pub use audit_log::AuditLogRepository;
pub use check_in::{AdmissionError, AdmitInput, CheckInRepository};
pub use portal::PortalRepository;
