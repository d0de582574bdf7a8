//! Portal repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::portal::{CreatePortalRequest, UpdatePortalRequest};

use crate::entities::PortalEntity;
use crate::metrics::QueryTimer;

/// Repository for portal-related database operations.
#[derive(Clone)]
pub struct PortalRepository {
    pool: PgPool,
}

impl PortalRepository {
    /// Creates a new PortalRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new portal owned by an organizer.
    ///
    /// A slug collision surfaces as a unique violation for the caller to
    /// map to a conflict response.
    pub async fn create(
        &self,
        organizer_id: Uuid,
        request: &CreatePortalRequest,
    ) -> Result<PortalEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_portal");
        let result = sqlx::query_as::<_, PortalEntity>(
            r#"
            INSERT INTO portals (organizer_id, slug, title, description, event_date,
                                 start_time, end_time, is_recurring, recurrence_pattern,
                                 recurrence_end, capacity, is_active, allow_self_registration,
                                 collect_phone, collect_dob, require_location, location_name,
                                 latitude, longitude, radius_meters, success_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(organizer_id)
        .bind(&request.slug)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.is_recurring)
        .bind(request.recurrence_pattern.map(|p| p.as_str()))
        .bind(request.recurrence_end)
        .bind(request.capacity)
        .bind(request.is_active)
        .bind(request.allow_self_registration)
        .bind(request.collect_phone)
        .bind(request.collect_dob)
        .bind(request.require_location)
        .bind(&request.location_name)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.radius_meters)
        .bind(&request.success_message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find portal by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PortalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_portal_by_id");
        let result = sqlx::query_as::<_, PortalEntity>(
            r#"
            SELECT * FROM portals WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find portal by its public slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<PortalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_portal_by_slug");
        let result = sqlx::query_as::<_, PortalEntity>(
            r#"
            SELECT * FROM portals WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all portals owned by an organizer, newest first.
    pub async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<PortalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_portals_by_organizer");
        let result = sqlx::query_as::<_, PortalEntity>(
            r#"
            SELECT * FROM portals
            WHERE organizer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a portal (partial update).
    /// Only provided fields are updated; None values are preserved.
    /// The slug is immutable and never touched here.
    pub async fn update(
        &self,
        id: Uuid,
        organizer_id: Uuid,
        request: &UpdatePortalRequest,
    ) -> Result<Option<PortalEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_portal");
        let result = sqlx::query_as::<_, PortalEntity>(
            r#"
            UPDATE portals SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                event_date = COALESCE($5, event_date),
                start_time = COALESCE($6, start_time),
                end_time = COALESCE($7, end_time),
                is_recurring = COALESCE($8, is_recurring),
                recurrence_pattern = COALESCE($9, recurrence_pattern),
                recurrence_end = COALESCE($10, recurrence_end),
                capacity = COALESCE($11, capacity),
                is_active = COALESCE($12, is_active),
                allow_self_registration = COALESCE($13, allow_self_registration),
                collect_phone = COALESCE($14, collect_phone),
                collect_dob = COALESCE($15, collect_dob),
                require_location = COALESCE($16, require_location),
                location_name = COALESCE($17, location_name),
                latitude = COALESCE($18, latitude),
                longitude = COALESCE($19, longitude),
                radius_meters = COALESCE($20, radius_meters),
                success_message = COALESCE($21, success_message),
                updated_at = NOW()
            WHERE id = $1 AND organizer_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(organizer_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.event_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.is_recurring)
        .bind(request.recurrence_pattern.map(|p| p.as_str()))
        .bind(request.recurrence_end)
        .bind(request.capacity)
        .bind(request.is_active)
        .bind(request.allow_self_registration)
        .bind(request.collect_phone)
        .bind(request.collect_dob)
        .bind(request.require_location)
        .bind(&request.location_name)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.radius_meters)
        .bind(&request.success_message)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a portal owned by an organizer.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: Uuid, organizer_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_portal");
        let result = sqlx::query(
            r#"
            DELETE FROM portals WHERE id = $1 AND organizer_id = $2
            "#,
        )
        .bind(id)
        .bind(organizer_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
