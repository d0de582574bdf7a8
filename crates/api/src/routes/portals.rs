//! Portal route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::audit_log::{AuditAction, CreateAuditLogInput};
use domain::models::portal::{
    CreatePortalRequest, ListPortalsResponse, Portal, PortalResponse, RecurrencePattern,
    UpdatePortalRequest,
};
use domain::services::eligibility::{self, Rejection, Verdict};
use persistence::repositories::{AuditLogRepository, CheckInRepository, PortalRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OrganizerId;

/// Attendee-facing view of a portal, including its computed admission
/// status. Owner-only fields (organizer, capacity numbers) stay private;
/// availability is surfaced as `spotsRemaining`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPortalResponse {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_end: Option<NaiveDate>,
    pub require_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    pub collect_phone: bool,
    pub collect_dob: bool,
    pub allow_self_registration: bool,
    pub status: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spots_remaining: Option<i64>,
}

/// Computes the public status for a portal at `now`.
///
/// Runs the same evaluator as the admission path, then folds in capacity,
/// so the portal page and the admission endpoint can never disagree about
/// whether check-in is open.
async fn portal_status(
    state: &AppState,
    portal: &Portal,
    now: DateTime<Utc>,
) -> Result<(Verdict, Option<i64>), ApiError> {
    let verdict = eligibility::evaluate(portal, now);
    if !verdict.is_active() {
        return Ok((verdict, None));
    }

    let Some(capacity) = portal.capacity else {
        return Ok((verdict, None));
    };

    let scope_day = if portal.is_recurring {
        Some(now.date_naive())
    } else {
        None
    };

    let admitted = CheckInRepository::new(state.pool.clone())
        .count_in_scope(portal.id, scope_day)
        .await?;

    if admitted >= i64::from(capacity) {
        return Ok((
            Verdict::Rejected(Rejection::capacity_reached(portal.is_recurring)),
            Some(0),
        ));
    }

    Ok((verdict, Some(i64::from(capacity) - admitted)))
}

/// GET /api/v1/portals/by-slug/:slug
///
/// Public portal lookup for the attendee-facing page.
pub async fn get_portal_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicPortalResponse>, ApiError> {
    let portal: Portal = PortalRepository::new(state.pool.clone())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Check-in portal not found".into()))?
        .into();

    let (status, spots_remaining) = portal_status(&state, &portal, Utc::now()).await?;

    Ok(Json(PublicPortalResponse {
        slug: portal.slug,
        title: portal.title,
        description: portal.description,
        event_date: portal.event_date,
        start_time: portal.start_time,
        end_time: portal.end_time,
        is_recurring: portal.is_recurring,
        recurrence_pattern: portal.recurrence_pattern,
        recurrence_end: portal.recurrence_end,
        require_location: portal.require_location,
        location_name: portal.location_name,
        collect_phone: portal.collect_phone,
        collect_dob: portal.collect_dob,
        allow_self_registration: portal.allow_self_registration,
        status,
        spots_remaining,
    }))
}

/// POST /api/v1/portals
pub async fn create_portal(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
    Json(request): Json<CreatePortalRequest>,
) -> Result<(StatusCode, Json<PortalResponse>), ApiError> {
    request.validate()?;

    let entity = PortalRepository::new(state.pool.clone())
        .create(organizer_id, &request)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("A portal with this slug already exists".into())
            }
            _ => ApiError::from(e),
        })?;

    let portal: Portal = entity.into();

    AuditLogRepository::new(state.pool.clone()).insert_async(
        CreateAuditLogInput::new(organizer_id, AuditAction::CreatePortal)
            .with_metadata(json!({"portalId": portal.id, "slug": portal.slug})),
    );

    info!(portal_id = %portal.id, slug = %portal.slug, "Portal created");

    Ok((StatusCode::CREATED, Json(portal.into())))
}

/// GET /api/v1/portals
pub async fn list_portals(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
) -> Result<Json<ListPortalsResponse>, ApiError> {
    let entities = PortalRepository::new(state.pool.clone())
        .list_by_organizer(organizer_id)
        .await?;

    let portals: Vec<PortalResponse> = entities
        .into_iter()
        .map(|e| PortalResponse::from(Portal::from(e)))
        .collect();
    let total = portals.len();

    Ok(Json(ListPortalsResponse { portals, total }))
}

/// GET /api/v1/portals/:portal_id
pub async fn get_portal(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
    Path(portal_id): Path<Uuid>,
) -> Result<Json<PortalResponse>, ApiError> {
    let portal: Portal = PortalRepository::new(state.pool.clone())
        .find_by_id(portal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Check-in portal not found".into()))?
        .into();

    if portal.organizer_id != organizer_id {
        return Err(ApiError::NotFound("Check-in portal not found".into()));
    }

    Ok(Json(portal.into()))
}

/// PATCH /api/v1/portals/:portal_id
pub async fn update_portal(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
    Path(portal_id): Path<Uuid>,
    Json(request): Json<UpdatePortalRequest>,
) -> Result<Json<PortalResponse>, ApiError> {
    request.validate()?;

    let entity = PortalRepository::new(state.pool.clone())
        .update(portal_id, organizer_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Check-in portal not found".into()))?;

    AuditLogRepository::new(state.pool.clone()).insert_async(
        CreateAuditLogInput::new(organizer_id, AuditAction::UpdatePortal)
            .with_metadata(json!({"portalId": portal_id})),
    );

    info!(portal_id = %portal_id, "Portal updated");

    Ok(Json(PortalResponse::from(Portal::from(entity))))
}

/// DELETE /api/v1/portals/:portal_id
pub async fn delete_portal(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
    Path(portal_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = PortalRepository::new(state.pool.clone())
        .delete(portal_id, organizer_id)
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Check-in portal not found".into()));
    }

    AuditLogRepository::new(state.pool.clone()).insert_async(
        CreateAuditLogInput::new(organizer_id, AuditAction::DeletePortal)
            .with_metadata(json!({"portalId": portal_id})),
    );

    info!(portal_id = %portal_id, "Portal deleted");

    Ok(StatusCode::NO_CONTENT)
}
