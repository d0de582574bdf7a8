//! Audit log route handlers.

use axum::{
    extract::{Query, State},
    Json,
};

use domain::models::audit_log::{ListAuditLogsQuery, ListAuditLogsResponse};
use persistence::repositories::AuditLogRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OrganizerId;

/// GET /api/v1/audit-logs
///
/// Lists the requesting organizer's audit entries, newest first, with
/// optional action and time range filters.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<ListAuditLogsResponse>, ApiError> {
    let max_per_page = state.config.limits.max_page_size;
    let default_per_page = state.config.limits.default_page_size;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(default_per_page)
        .clamp(1, max_per_page);

    let effective = ListAuditLogsQuery {
        page: Some(page),
        per_page: Some(per_page),
        ..query
    };

    let (logs, total) = AuditLogRepository::new(state.pool.clone())
        .list(organizer_id, &effective, max_per_page)
        .await?;

    Ok(Json(ListAuditLogsResponse {
        logs,
        total,
        page,
        per_page,
    }))
}
