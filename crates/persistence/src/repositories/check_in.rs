//! Check-in repository for database operations.
//!
//! Admission is the one write path with real concurrency pressure: two
//! requests for the last remaining seat, or the same attendee double
//! submitting, must resolve to exactly one stored row. `admit` runs in a
//! transaction that locks the portal row, so the capacity count and the
//! insert are serialized per portal, and the partial unique indexes on
//! check_ins make the duplicate guard hold even outside this code path.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CheckInEntity;
use crate::metrics::QueryTimer;

/// Failure modes of an admission attempt.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("portal not found")]
    PortalNotFound,
    #[error("attendee already checked in for this scope")]
    Duplicate,
    #[error("portal capacity exhausted")]
    CapacityExceeded,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Input for recording an admission.
#[derive(Debug, Clone)]
pub struct AdmitInput {
    pub portal_id: Uuid,
    pub attendee_id: Uuid,
    /// UTC calendar day for recurring portals, None for single events.
    pub scope_day: Option<NaiveDate>,
    /// Remaining seats to enforce; None means unlimited.
    pub capacity: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Repository for check-in database operations.
#[derive(Clone)]
pub struct CheckInRepository {
    pool: PgPool,
}

impl CheckInRepository {
    /// Creates a new CheckInRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count admissions for a portal within a scope (a specific day for
    /// recurring portals, the whole portal for single events).
    pub async fn count_in_scope(
        &self,
        portal_id: Uuid,
        scope_day: Option<NaiveDate>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_check_ins_in_scope");
        let count: (i64,) = match scope_day {
            Some(day) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM check_ins
                    WHERE portal_id = $1 AND scope_day = $2
                    "#,
                )
                .bind(portal_id)
                .bind(day)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM check_ins
                    WHERE portal_id = $1 AND scope_day IS NULL
                    "#,
                )
                .bind(portal_id)
                .fetch_one(&self.pool)
                .await?
            }
        };
        timer.record();
        Ok(count.0)
    }

    /// Record an admission, enforcing capacity and uniqueness atomically.
    ///
    /// Locks the portal row for the duration of the transaction so the
    /// capacity count cannot race a concurrent insert. A unique violation
    /// on the scope index maps to `AdmissionError::Duplicate`.
    pub async fn admit(&self, input: AdmitInput) -> Result<CheckInEntity, AdmissionError> {
        let timer = QueryTimer::new("admit_check_in");
        let result = self.admit_inner(&input).await;
        timer.record();
        result
    }

    async fn admit_inner(&self, input: &AdmitInput) -> Result<CheckInEntity, AdmissionError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM portals WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(input.portal_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Err(AdmissionError::PortalNotFound);
        }

        if let Some(capacity) = input.capacity {
            let count: i64 = match input.scope_day {
                Some(day) => {
                    sqlx::query_scalar(
                        r#"
                        SELECT COUNT(*) FROM check_ins
                        WHERE portal_id = $1 AND scope_day = $2
                        "#,
                    )
                    .bind(input.portal_id)
                    .bind(day)
                    .fetch_one(&mut *tx)
                    .await?
                }
                None => {
                    sqlx::query_scalar(
                        r#"
                        SELECT COUNT(*) FROM check_ins
                        WHERE portal_id = $1 AND scope_day IS NULL
                        "#,
                    )
                    .bind(input.portal_id)
                    .fetch_one(&mut *tx)
                    .await?
                }
            };

            if count >= i64::from(capacity) {
                return Err(AdmissionError::CapacityExceeded);
            }
        }

        let inserted = sqlx::query_as::<_, CheckInEntity>(
            r#"
            INSERT INTO check_ins (portal_id, attendee_id, scope_day, ip_address,
                                   user_agent, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(input.portal_id)
        .bind(input.attendee_id)
        .bind(input.scope_day)
        .bind(&input.ip_address)
        .bind(&input.user_agent)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(entity) => {
                tx.commit().await?;
                Ok(entity)
            }
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(AdmissionError::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether an attendee already holds an admission in a scope.
    pub async fn exists_in_scope(
        &self,
        portal_id: Uuid,
        attendee_id: Uuid,
        scope_day: Option<NaiveDate>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_in_exists_in_scope");
        let exists: (bool,) = match scope_day {
            Some(day) => {
                sqlx::query_as(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM check_ins
                        WHERE portal_id = $1 AND attendee_id = $2 AND scope_day = $3
                    )
                    "#,
                )
                .bind(portal_id)
                .bind(attendee_id)
                .bind(day)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM check_ins
                        WHERE portal_id = $1 AND attendee_id = $2 AND scope_day IS NULL
                    )
                    "#,
                )
                .bind(portal_id)
                .bind(attendee_id)
                .fetch_one(&self.pool)
                .await?
            }
        };
        timer.record();
        Ok(exists.0)
    }

    /// List admissions for a portal, newest first.
    pub async fn list_for_portal(
        &self,
        portal_id: Uuid,
    ) -> Result<Vec<CheckInEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_check_ins_for_portal");
        let result = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT * FROM check_ins
            WHERE portal_id = $1
            ORDER BY checked_in_at DESC
            "#,
        )
        .bind(portal_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
