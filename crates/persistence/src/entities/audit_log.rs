//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::audit_log::AuditLog;

/// Database row mapping for the audit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub action: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntity> for AuditLog {
    fn from(entity: AuditLogEntity) -> Self {
        Self {
            id: entity.id,
            organizer_id: entity.organizer_id,
            action: entity.action,
            metadata: entity.metadata,
            created_at: entity.created_at,
        }
    }
}
