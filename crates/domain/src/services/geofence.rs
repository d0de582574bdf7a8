//! Venue proximity verification.

use crate::models::check_in::Coordinates;
use crate::models::portal::Portal;
use crate::services::eligibility::Rejection;
use shared::geo;

/// Verifies attendee coordinates against the portal's geofence.
///
/// Portals that do not require location always pass. Portals that require
/// location but have no venue coordinates configured also pass, since
/// there is nothing to measure against. Otherwise the attendee must be
/// within the configured radius of the venue.
pub fn verify_location(portal: &Portal, coordinates: Option<Coordinates>) -> Result<(), Rejection> {
    if !portal.require_location {
        return Ok(());
    }

    let (venue_lat, venue_lon) = match (portal.latitude, portal.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Ok(()),
    };

    let coords = coordinates.ok_or_else(Rejection::location_required)?;

    let radius = portal.effective_radius_meters();
    let distance = geo::haversine_distance_meters(
        coords.latitude,
        coords.longitude,
        venue_lat,
        venue_lon,
    );

    if distance > f64::from(radius) {
        return Err(Rejection::proximity_failed(radius));
    }

    Ok(())
}
