//! Attendee entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::attendee::Attendee;

/// Database row mapping for the attendees table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeEntity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AttendeeEntity> for Attendee {
    fn from(entity: AttendeeEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            phone: entity.phone,
            date_of_birth: entity.date_of_birth,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendee_entity_to_domain() {
        let entity = AttendeeEntity {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            phone: Some("+15551234".to_string()),
            date_of_birth: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let attendee: Attendee = entity.clone().into();
        assert_eq!(attendee.id, entity.id);
        assert_eq!(attendee.email, "ada@example.com");
        assert_eq!(attendee.phone.as_deref(), Some("+15551234"));
    }
}
