//! Audit log domain model.
//!
//! Audit entries are an append-only record of organizer-relevant actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actions recorded in the audit log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditAction {
    #[serde(rename = "ATTENDEE_CHECKIN")]
    AttendeeCheckIn,
    #[serde(rename = "CREATE_PORTAL")]
    CreatePortal,
    #[serde(rename = "UPDATE_PORTAL")]
    UpdatePortal,
    #[serde(rename = "DELETE_PORTAL")]
    DeletePortal,
}

impl AuditAction {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AttendeeCheckIn => "ATTENDEE_CHECKIN",
            AuditAction::CreatePortal => "CREATE_PORTAL",
            AuditAction::UpdatePortal => "UPDATE_PORTAL",
            AuditAction::DeletePortal => "DELETE_PORTAL",
        }
    }

    /// Parses from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ATTENDEE_CHECKIN" => Some(AuditAction::AttendeeCheckIn),
            "CREATE_PORTAL" => Some(AuditAction::CreatePortal),
            "UPDATE_PORTAL" => Some(AuditAction::UpdatePortal),
            "DELETE_PORTAL" => Some(AuditAction::DeletePortal),
            _ => None,
        }
    }
}

/// An audit log entry, attributed to the owning organizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub action: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLogInput {
    pub organizer_id: Uuid,
    pub action: AuditAction,
    pub metadata: Option<serde_json::Value>,
}

impl CreateAuditLogInput {
    pub fn new(organizer_id: Uuid, action: AuditAction) -> Self {
        Self {
            organizer_id,
            action,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Query parameters for listing audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsQuery {
    pub action: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response for listing audit logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsResponse {
    pub logs: Vec<AuditLog>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
