//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that a portal slug contains only lowercase letters, digits,
/// and hyphens.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message =
            Some("Slug can only contain lowercase letters, numbers, and hyphens".into());
        Err(err)
    }
}

/// Validates that a geofence radius is positive.
pub fn validate_radius(radius_meters: i32) -> Result<(), ValidationError> {
    if radius_meters > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("radius_range");
        err.message = Some("Radius must be a positive number of meters".into());
        Err(err)
    }
}

/// Validates that a portal capacity is positive.
pub fn validate_capacity(capacity: i32) -> Result<(), ValidationError> {
    if capacity > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("capacity_range");
        err.message = Some("Capacity must be positive".into());
        Err(err)
    }
}
