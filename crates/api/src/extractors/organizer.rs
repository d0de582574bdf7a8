//! Organizer identity extractor.
//!
//! Authentication is handled upstream; the session layer forwards the
//! authenticated organizer's UUID in the `X-Organizer-Id` header. This
//! extractor makes that identity available to handlers and rejects
//! requests where the header is absent or malformed.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated organizer's UUID.
pub const ORGANIZER_ID_HEADER: &str = "X-Organizer-Id";

/// The authenticated organizer making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OrganizerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ORGANIZER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized(format!("Missing {} header", ORGANIZER_ID_HEADER))
            })?;

        let id = value.parse::<Uuid>().map_err(|_| {
            ApiError::Unauthorized(format!("Invalid {} header", ORGANIZER_ID_HEADER))
        })?;

        Ok(OrganizerId(id))
    }
}
