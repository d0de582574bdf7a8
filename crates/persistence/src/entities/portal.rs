//! Portal entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::portal::{Portal, RecurrencePattern};

/// Database row mapping for the portals table.
#[derive(Debug, Clone, FromRow)]
pub struct PortalEntity {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub recurrence_end: Option<NaiveDate>,
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

impl From<PortalEntity> for Portal {
    fn from(entity: PortalEntity) -> Self {
        Self {
            id: entity.id,
            organizer_id: entity.organizer_id,
            slug: entity.slug,
            title: entity.title,
            description: entity.description,
            event_date: entity.event_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            is_recurring: entity.is_recurring,
            recurrence_pattern: entity
                .recurrence_pattern
                .as_deref()
                .and_then(RecurrencePattern::parse),
            recurrence_end: entity.recurrence_end,
            capacity: entity.capacity,
            is_active: entity.is_active,
            allow_self_registration: entity.allow_self_registration,
            collect_phone: entity.collect_phone,
            collect_dob: entity.collect_dob,
            require_location: entity.require_location,
            location_name: entity.location_name,
            latitude: entity.latitude,
            longitude: entity.longitude,
            radius_meters: entity.radius_meters,
            success_message: entity.success_message,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
