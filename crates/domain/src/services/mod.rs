//! Domain services for the check-in backend.
//!
//! Services contain the admission policy logic that operates on domain
//! models. Both the admission write path and the public portal status
//! endpoint call into the same evaluator, so the rules live in exactly
//! one place.

pub mod eligibility;
pub mod geofence;

pub use eligibility::{evaluate, Rejection, RejectionReason, Verdict};
pub use geofence::verify_location;
