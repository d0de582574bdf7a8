//! Check-in entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::check_in::CheckIn;

/// Database row mapping for the check_ins table.
#[derive(Debug, Clone, FromRow)]
pub struct CheckInEntity {
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

impl From<CheckInEntity> for CheckIn {
    fn from(entity: CheckInEntity) -> Self {
        Self {
            id: entity.id,
            portal_id: entity.portal_id,
            attendee_id: entity.attendee_id,
            checked_in_at: entity.checked_in_at,
            scope_day: entity.scope_day,
            ip_address: entity.ip_address,
            user_agent: entity.user_agent,
            latitude: entity.latitude,
            longitude: entity.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_entity_to_domain() {
        let entity = CheckInEntity {
            id: Uuid::new_v4(),
            portal_id: Uuid::new_v4(),
            attendee_id: Uuid::new_v4(),
            checked_in_at: Utc::now(),
            scope_day: Some("2026-03-04".parse().unwrap()),
            ip_address: Some("203.0.113.9".to_string()),
            user_agent: None,
            latitude: Some(40.0),
            longitude: Some(-74.0),
        };

        let check_in: CheckIn = entity.clone().into();
        assert_eq!(check_in.id, entity.id);
        assert_eq!(check_in.scope_day, entity.scope_day);
        assert_eq!(check_in.latitude, Some(40.0));
    }
}
