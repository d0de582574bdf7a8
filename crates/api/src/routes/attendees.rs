//! Attendee route handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use domain::models::attendee::{Attendee, AttendeeResponse, RegisterAttendeeRequest};
use persistence::repositories::{AttendeeRepository, PortalRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OrganizerId;

/// POST /api/v1/attendees
///
/// Registers an attendee, or completes the profile of a returning one.
/// When a portal is named and the attendee is new, the portal's
/// self-registration flag gates the request.
pub async fn register_attendee(
    State(state): State<AppState>,
    Json(request): Json<RegisterAttendeeRequest>,
) -> Result<(StatusCode, Json<AttendeeResponse>), ApiError> {
    request.validate()?;

    let attendee_repo = AttendeeRepository::new(state.pool.clone());
    let existing = attendee_repo.find_by_email(&request.email).await?;

    if existing.is_none() {
        if let Some(portal_id) = request.portal_id {
            let portal = PortalRepository::new(state.pool.clone())
                .find_by_id(portal_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Check-in portal not found".into()))?;

            if !portal.allow_self_registration {
                return Err(ApiError::Forbidden(
                    "Self-registration is disabled for this event".into(),
                ));
            }
        }
    }

    let created = existing.is_none();
    let entity = attendee_repo.upsert(&request).await?;
    let attendee = Attendee::from(entity);

    info!(attendee_id = %attendee.id, created = created, "Attendee registered");

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(attendee.into())))
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// GET /api/v1/attendees/by-email?email=
///
/// Organizer-side lookup used to resolve an attendee before check-in.
pub async fn find_attendee_by_email(
    State(state): State<AppState>,
    OrganizerId(_organizer_id): OrganizerId,
    Query(query): Query<EmailQuery>,
) -> Result<Json<AttendeeResponse>, ApiError> {
    let attendee: Attendee = AttendeeRepository::new(state.pool.clone())
        .find_by_email(&query.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendee not found".into()))?
        .into();

    Ok(Json(attendee.into()))
}
