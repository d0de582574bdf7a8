//! Portal domain model (the check-in page configuration).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Geofence radius applied when a portal requires location but does not
/// configure one explicitly.
pub const DEFAULT_RADIUS_METERS: i32 = 100;

/// Default message shown to attendees after a successful check-in.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you for checking in!";

/// Represents a check-in portal for a single event or a recurring series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Anchor date: the event date for single events, the pattern anchor
    /// for recurring ones.
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    /// Inclusive end date for a recurring series.
    pub recurrence_end: Option<NaiveDate>,
    /// Admission ceiling; None means unlimited.
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub allow_self_registration: bool,
    pub collect_phone: bool,
    pub collect_dob: bool,
    pub require_location: bool,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: Option<i32>,
    pub success_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Portal {
    /// Effective geofence radius, falling back to the platform default.
    pub fn effective_radius_meters(&self) -> i32 {
        self.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS)
    }
}

/// How a recurring portal repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "DAILY",
            RecurrencePattern::Weekly => "WEEKLY",
            RecurrencePattern::Monthly => "MONTHLY",
        }
    }

    /// Parses from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DAILY" => Some(RecurrencePattern::Daily),
            "WEEKLY" => Some(RecurrencePattern::Weekly),
            "MONTHLY" => Some(RecurrencePattern::Monthly),
            _ => None,
        }
    }
}

fn default_is_active() -> bool {
    true
}

fn default_allow_self_registration() -> bool {
    true
}

fn default_radius() -> Option<i32> {
    Some(DEFAULT_RADIUS_METERS)
}

fn default_success_message() -> Option<String> {
    Some(DEFAULT_SUCCESS_MESSAGE.to_string())
}

/// Request payload for creating a portal.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    #[validate(custom(function = "validate_slug_field"))]
    pub slug: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,

    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_end: Option<NaiveDate>,

    #[validate(custom(function = "validate_capacity_field"))]
    pub capacity: Option<i32>,

    #[serde(default = "default_is_active")]
    pub is_active: bool,

    #[serde(default = "default_allow_self_registration")]
    pub allow_self_registration: bool,

    #[serde(default)]
    pub collect_phone: bool,
    #[serde(default)]
    pub collect_dob: bool,

    #[serde(default)]
    pub require_location: bool,
    pub location_name: Option<String>,

    #[validate(custom(function = "validate_latitude_field"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "validate_longitude_field"))]
    pub longitude: Option<f64>,

    #[serde(default = "default_radius")]
    #[validate(custom(function = "validate_radius_field"))]
    pub radius_meters: Option<i32>,

    #[serde(default = "default_success_message")]
    pub success_message: Option<String>,
}

/// Request payload for updating a portal (partial update).
///
/// The slug is immutable after creation and intentionally absent here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_end: Option<NaiveDate>,

    #[validate(custom(function = "validate_capacity_field"))]
    pub capacity: Option<i32>,

    pub is_active: Option<bool>,
    pub allow_self_registration: Option<bool>,
    pub collect_phone: Option<bool>,
    pub collect_dob: Option<bool>,
    pub require_location: Option<bool>,
    pub location_name: Option<String>,

    #[validate(custom(function = "validate_latitude_field"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "validate_longitude_field"))]
    pub longitude: Option<f64>,

    #[validate(custom(function = "validate_radius_field"))]
    pub radius_meters: Option<i32>,

    pub success_message: Option<String>,
}

fn validate_slug_field(slug: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_slug(slug)
}

fn validate_latitude_field(lat: f64) -> Result<(), validator::ValidationError> {
    shared::validation::validate_latitude(lat)
}

fn validate_longitude_field(lon: f64) -> Result<(), validator::ValidationError> {
    shared::validation::validate_longitude(lon)
}

fn validate_radius_field(radius: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_radius(radius)
}

fn validate_capacity_field(capacity: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_capacity(capacity)
}

/// Response payload for portal operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalResponse {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub allow_self_registration: bool,
    pub collect_phone: bool,
    pub collect_dob: bool,
    pub require_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Portal> for PortalResponse {
    fn from(p: Portal) -> Self {
        Self {
            id: p.id,
            organizer_id: p.organizer_id,
            slug: p.slug,
            title: p.title,
            description: p.description,
            event_date: p.event_date,
            start_time: p.start_time,
            end_time: p.end_time,
            is_recurring: p.is_recurring,
            recurrence_pattern: p.recurrence_pattern,
            recurrence_end: p.recurrence_end,
            capacity: p.capacity,
            is_active: p.is_active,
            allow_self_registration: p.allow_self_registration,
            collect_phone: p.collect_phone,
            collect_dob: p.collect_dob,
            require_location: p.require_location,
            location_name: p.location_name,
            latitude: p.latitude,
            longitude: p.longitude,
            radius_meters: p.radius_meters,
            success_message: p.success_message,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Response for listing an organizer's portals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPortalsResponse {
    pub portals: Vec<PortalResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_pattern_serialization() {
        assert_eq!(
            serde_json::to_string(&RecurrencePattern::Daily).unwrap(),
            "\"DAILY\""
        );
        assert_eq!(
            serde_json::to_string(&RecurrencePattern::Weekly).unwrap(),
            "\"WEEKLY\""
        );
        assert_eq!(
            serde_json::to_string(&RecurrencePattern::Monthly).unwrap(),
            "\"MONTHLY\""
        );
    }

    #[test]
    fn test_recurrence_pattern_roundtrip() {
        for s in ["DAILY", "WEEKLY", "MONTHLY"] {
            let p = RecurrencePattern::parse(s).unwrap();
            assert_eq!(p.as_str(), s);
        }
        assert_eq!(RecurrencePattern::parse("YEARLY"), None);
    }

    #[test]
    fn test_create_portal_request_defaults() {
        let json = r#"{
            "title": "Spring Gala",
            "slug": "spring-gala-2026",
            "eventDate": "2026-03-01"
        }"#;

        let request: CreatePortalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.title, "Spring Gala");
        assert_eq!(request.slug, "spring-gala-2026");
        assert!(request.is_active);
        assert!(request.allow_self_registration);
        assert!(!request.is_recurring);
        assert!(!request.require_location);
        assert_eq!(request.radius_meters, Some(DEFAULT_RADIUS_METERS));
        assert_eq!(
            request.success_message.as_deref(),
            Some(DEFAULT_SUCCESS_MESSAGE)
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_portal_request_rejects_bad_slug() {
        let json = r#"{
            "title": "Spring Gala",
            "slug": "Spring Gala!",
            "eventDate": "2026-03-01"
        }"#;

        let request: CreatePortalRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_portal_request_rejects_zero_capacity() {
        let json = r#"{
            "title": "Spring Gala",
            "slug": "spring-gala",
            "eventDate": "2026-03-01",
            "capacity": 0
        }"#;

        let request: CreatePortalRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_portal_request_partial() {
        let json = r#"{"title": "Renamed"}"#;
        let request: UpdatePortalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.title, Some("Renamed".to_string()));
        assert!(request.capacity.is_none());
        assert!(request.is_active.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_effective_radius_defaults() {
        let json = r#"{
            "title": "Gala",
            "slug": "gala",
            "eventDate": "2026-03-01"
        }"#;
        let request: CreatePortalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.radius_meters, Some(100));
    }

    #[test]
    fn test_portal_response_skips_absent_fields() {
        let portal = Portal {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            slug: "gala".to_string(),
            title: "Gala".to_string(),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            start_time: None,
            end_time: None,
            is_recurring: false,
            recurrence_pattern: None,
            recurrence_end: None,
            capacity: None,
            is_active: true,
            allow_self_registration: true,
            collect_phone: false,
            collect_dob: false,
            require_location: false,
            location_name: None,
            latitude: None,
            longitude: None,
            radius_meters: None,
            success_message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: PortalResponse = portal.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"slug\":\"gala\""));
        assert!(!json.contains("\"capacity\""));
        assert!(!json.contains("\"recurrencePattern\""));
    }
}
