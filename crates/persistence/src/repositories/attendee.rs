//! Attendee repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::attendee::RegisterAttendeeRequest;

use crate::entities::AttendeeEntity;
use crate::metrics::QueryTimer;

/// Repository for attendee-related database operations.
#[derive(Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    /// Creates a new AttendeeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find attendee by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendee_by_id");
        let result = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            SELECT * FROM attendees WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find attendee by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<AttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendee_by_email");
        let result = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            SELECT * FROM attendees WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Register an attendee, updating the existing profile when the email
    /// is already known. Profile fields only ever gain information: absent
    /// values in the request never clear stored ones.
    pub async fn upsert(
        &self,
        request: &RegisterAttendeeRequest,
    ) -> Result<AttendeeEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_attendee");
        let result = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            INSERT INTO attendees (email, full_name, phone, date_of_birth)
            VALUES (LOWER($1), $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                phone = COALESCE(EXCLUDED.phone, attendees.phone),
                date_of_birth = COALESCE(EXCLUDED.date_of_birth, attendees.date_of_birth),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&request.email)
        .bind(&request.full_name)
        .bind(&request.phone)
        .bind(request.date_of_birth)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repository_creation() {
        // This test verifies the AttendeeRepository can be created
        // Actual database tests are integration tests
    }
}
