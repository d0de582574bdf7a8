//! Audit log repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::audit_log::{AuditLog, CreateAuditLogInput, ListAuditLogsQuery};

use crate::entities::AuditLogEntity;
use crate::metrics::QueryTimer;

/// Helper struct for building dynamic WHERE clauses from audit log filters.
/// Tracks conditions and parameter positions to avoid code duplication.
struct AuditLogFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl AuditLogFilterBuilder {
    /// Build filter conditions from a query.
    fn build(query: &ListAuditLogsQuery) -> Self {
        let mut conditions = vec!["organizer_id = $1".to_string()];
        let mut param_count = 1;

        if query.action.is_some() {
            param_count += 1;
            conditions.push(format!("action = ${}", param_count));
        }

        if query.from.is_some() {
            param_count += 1;
            conditions.push(format!("created_at >= ${}", param_count));
        }

        if query.to.is_some() {
            param_count += 1;
            conditions.push(format!("created_at <= ${}", param_count));
        }

        Self {
            conditions,
            param_count,
        }
    }

    fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind query filter parameters to a SQLx builder.
/// This avoids code duplication for binding optional query parameters.
macro_rules! bind_query_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref action) = $query.action {
            b = b.bind(action);
        }
        if let Some(ref from) = $query.from {
            b = b.bind(from);
        }
        if let Some(ref to) = $query.to {
            b = b.bind(to);
        }
        b
    }};
}

/// Repository for audit log database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new audit log entry.
    pub async fn insert(&self, input: CreateAuditLogInput) -> Result<AuditLog, sqlx::Error> {
        let timer = QueryTimer::new("insert_audit_log");
        let entity = sqlx::query_as::<_, AuditLogEntity>(
            r#"
            INSERT INTO audit_logs (organizer_id, action, metadata)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(input.organizer_id)
        .bind(input.action.as_str())
        .bind(&input.metadata)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(entity?.into())
    }

    /// Insert audit log entry asynchronously (fire and forget).
    /// Uses tokio::spawn to avoid blocking the request.
    pub fn insert_async(&self, input: CreateAuditLogInput) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let repo = AuditLogRepository::new(pool);
            if let Err(e) = repo.insert(input).await {
                tracing::error!("Failed to insert audit log: {}", e);
            }
        });
    }

    /// List an organizer's audit logs with pagination and filtering.
    pub async fn list(
        &self,
        organizer_id: Uuid,
        query: &ListAuditLogsQuery,
        max_per_page: u32,
    ) -> Result<(Vec<AuditLog>, i64), sqlx::Error> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, max_per_page);
        let offset = ((page - 1) * per_page) as i64;

        let filter = AuditLogFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let timer = QueryTimer::new("list_audit_logs");

        let count_query = format!("SELECT COUNT(*) FROM audit_logs WHERE {}", where_clause);
        let count_builder = sqlx::query_scalar::<_, i64>(&count_query).bind(organizer_id);
        let count_builder = bind_query_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT * FROM audit_logs
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            param_count + 1,
            param_count + 2
        );

        let list_builder = sqlx::query_as::<_, AuditLogEntity>(&list_query).bind(organizer_id);
        let list_builder = bind_query_filters!(list_builder, query);
        let entities = list_builder
            .bind(per_page as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        timer.record();

        let logs = entities.into_iter().map(AuditLog::from).collect();
        Ok((logs, total))
    }
}
