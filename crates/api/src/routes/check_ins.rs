//! Check-in (admission) route handlers.
//!
//! `create_check_in` is the admission orchestrator. Checks run in a fixed
//! order with the first failure winning: eligibility, capacity, geofence,
//! duplicate. Capacity is checked again inside the storage transaction, so
//! the early check here only decides which rejection the caller sees first.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::audit_log::{AuditAction, CreateAuditLogInput};
use domain::models::check_in::{CheckIn, CheckInRequest, CheckInResponse, ListCheckInsResponse};
use domain::models::portal::Portal;
use domain::services::eligibility::{self, Rejection, Verdict};
use domain::services::geofence;
use persistence::repositories::{
    AdmissionError, AdmitInput, AttendeeRepository, AuditLogRepository, CheckInRepository,
    PortalRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ClientInfo, OrganizerId};
use crate::middleware::metrics::{record_check_in_admitted, record_check_in_rejected};

/// Fallback admission message when the portal does not configure one.
const DEFAULT_ADMISSION_MESSAGE: &str = "Attendee checked in successfully";

fn reject(rejection: Rejection) -> ApiError {
    record_check_in_rejected(rejection.reason.as_str());
    ApiError::Rejected(rejection)
}

/// POST /api/v1/check-ins
///
/// Public admission endpoint used by the attendee-facing portal page.
pub async fn create_check_in(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(request): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), ApiError> {
    request.validate()?;

    let portal_repo = PortalRepository::new(state.pool.clone());
    let portal: Portal = portal_repo
        .find_by_id(request.portal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Check-in portal not found".into()))?
        .into();

    let attendee_repo = AttendeeRepository::new(state.pool.clone());
    let attendee = attendee_repo
        .find_by_id(request.attendee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendee not found".into()))?;

    let now = Utc::now();
    if let Verdict::Rejected(rejection) = eligibility::evaluate(&portal, now) {
        return Err(reject(rejection));
    }

    let scope_day = if portal.is_recurring {
        Some(now.date_naive())
    } else {
        None
    };

    let check_in_repo = CheckInRepository::new(state.pool.clone());
    if let Some(capacity) = portal.capacity {
        let admitted = check_in_repo.count_in_scope(portal.id, scope_day).await?;
        if admitted >= i64::from(capacity) {
            return Err(reject(Rejection::capacity_reached(portal.is_recurring)));
        }
    }

    geofence::verify_location(&portal, request.coordinates()).map_err(reject)?;

    // Pre-insert duplicate check. The partial unique indexes still back
    // this up: a concurrent submission that slips past the read surfaces
    // as `AdmissionError::Duplicate` from the insert below.
    if check_in_repo
        .exists_in_scope(portal.id, attendee.id, scope_day)
        .await?
    {
        return Err(reject(Rejection::duplicate(portal.is_recurring)));
    }

    let entity = check_in_repo
        .admit(AdmitInput {
            portal_id: portal.id,
            attendee_id: attendee.id,
            scope_day,
            capacity: portal.capacity,
            ip_address: client.ip_address,
            user_agent: client.user_agent,
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await
        .map_err(|e| match e {
            AdmissionError::PortalNotFound => {
                ApiError::NotFound("Check-in portal not found".into())
            }
            AdmissionError::Duplicate => reject(Rejection::duplicate(portal.is_recurring)),
            AdmissionError::CapacityExceeded => {
                reject(Rejection::capacity_reached(portal.is_recurring))
            }
            AdmissionError::Database(e) => e.into(),
        })?;

    // Awaited, not spawned: every stored admission gets its audit entry
    // before the response goes out. The admission itself is already
    // committed, so a failed audit write is logged rather than surfaced.
    let audit_entry =
        CreateAuditLogInput::new(portal.organizer_id, AuditAction::AttendeeCheckIn).with_metadata(
            json!({
                "portalId": portal.id,
                "attendeeId": attendee.id,
                "checkInId": entity.id,
            }),
        );
    if let Err(e) = AuditLogRepository::new(state.pool.clone())
        .insert(audit_entry)
        .await
    {
        tracing::error!(error = %e, check_in_id = %entity.id, "Failed to write check-in audit entry");
    }

    record_check_in_admitted();
    info!(
        portal_id = %portal.id,
        attendee_id = %attendee.id,
        check_in_id = %entity.id,
        "Attendee checked in"
    );

    let message = portal
        .success_message
        .unwrap_or_else(|| DEFAULT_ADMISSION_MESSAGE.to_string());

    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            id: entity.id,
            portal_id: entity.portal_id,
            attendee_id: entity.attendee_id,
            checked_in_at: entity.checked_in_at,
            message,
        }),
    ))
}

/// GET /api/v1/portals/:portal_id/check-ins
///
/// Lists a portal's admissions for its owning organizer.
pub async fn list_portal_check_ins(
    State(state): State<AppState>,
    OrganizerId(organizer_id): OrganizerId,
    Path(portal_id): Path<Uuid>,
) -> Result<Json<ListCheckInsResponse>, ApiError> {
    let portal_repo = PortalRepository::new(state.pool.clone());
    let portal = portal_repo
        .find_by_id(portal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Check-in portal not found".into()))?;

    // Ownership is part of the lookup: another organizer's portal is
    // indistinguishable from a missing one.
    if portal.organizer_id != organizer_id {
        return Err(ApiError::NotFound("Check-in portal not found".into()));
    }

    let entities = CheckInRepository::new(state.pool.clone())
        .list_for_portal(portal_id)
        .await?;

    let check_ins: Vec<CheckIn> = entities.into_iter().map(CheckIn::from).collect();
    let total = check_ins.len();

    Ok(Json(ListCheckInsResponse { check_ins, total }))
}
