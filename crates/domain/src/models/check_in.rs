//! Check-in (admission record) domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A successful admission recorded against a portal/attendee pair.
///
/// For recurring portals `scope_day` holds the UTC calendar day of the
/// admission; for single-event portals it is None. Uniqueness of
/// (portal, attendee, scope) is enforced by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub portal_id: Uuid,
    pub attendee_id: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub scope_day: Option<NaiveDate>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A latitude/longitude pair supplied by the attendee's device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Request payload for an admission attempt.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub portal_id: Uuid,
    pub attendee_id: Uuid,

    #[validate(custom(function = "validate_latitude_field"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "validate_longitude_field"))]
    pub longitude: Option<f64>,
}

impl CheckInRequest {
    /// Supplied device coordinates, when both components are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

fn validate_latitude_field(lat: f64) -> Result<(), validator::ValidationError> {
    shared::validation::validate_latitude(lat)
}

fn validate_longitude_field(lon: f64) -> Result<(), validator::ValidationError> {
    shared::validation::validate_longitude(lon)
}

/// Response payload for a successful admission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub id: Uuid,
    pub portal_id: Uuid,
    pub attendee_id: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub message: String,
}

/// Response for listing a portal's admissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCheckInsResponse {
    pub check_ins: Vec<CheckIn>,
    pub total: usize,
}
