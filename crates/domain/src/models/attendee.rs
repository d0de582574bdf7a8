//! Attendee domain model.
//!
//! Attendees are global identities keyed by email: one record per person
//! across the whole platform, created lazily on first contact and updated
//! in place as more profile fields are collected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents an attendee in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for registering (or completing the profile of) an attendee.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendeeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,

    #[validate(length(max = 20, message = "Phone number too long"))]
    pub phone: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    /// When set, registration is gated by this portal's
    /// `allowSelfRegistration` flag for first-time attendees.
    pub portal_id: Option<Uuid>,
}

/// Response payload for attendee operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Attendee> for AttendeeResponse {
    fn from(a: Attendee) -> Self {
        Self {
            id: a.id,
            email: a.email,
            full_name: a.full_name,
            phone: a.phone,
            date_of_birth: a.date_of_birth,
            created_at: a.created_at,
        }
    }
}
