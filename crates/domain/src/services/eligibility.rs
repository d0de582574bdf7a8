//! Check-in eligibility evaluation.
//!
//! `evaluate` is the single authoritative implementation of the admission
//! policy: activation state, recurrence window, recurrence pattern, daily
//! time window, and single-event date window, checked in a fixed order
//! with the first failure winning. All comparisons are made in UTC.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::portal::{Portal, RecurrencePattern};
use shared::clock;

/// Outcome of evaluating a portal at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state")]
pub enum Verdict {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "REJECTED")]
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_active(&self) -> bool {
        matches!(self, Verdict::Active)
    }
}

/// A rejection with a machine-readable reason and a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub reason: RejectionReason,
    pub message: String,
}

impl Rejection {
    fn new(reason: RejectionReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    /// Capacity rejection; the wording differs between a full session of a
    /// recurring series and a full single event.
    pub fn capacity_reached(is_recurring: bool) -> Self {
        let message = if is_recurring {
            "Today's session has reached its full capacity."
        } else {
            "Event capacity reached. No more check-ins allowed."
        };
        Self::new(RejectionReason::CapacityReached, message)
    }

    /// Duplicate-admission rejection, scoped to today for recurring portals.
    pub fn duplicate(is_recurring: bool) -> Self {
        let message = if is_recurring {
            "You have already checked in for today's session."
        } else {
            "Duplicate check-in detected. You are already registered for this event."
        };
        Self::new(RejectionReason::Duplicate, message)
    }

    /// Required coordinates were not supplied.
    pub fn location_required() -> Self {
        Self::new(
            RejectionReason::LocationRequired,
            "Location access is required to verify your attendance.",
        )
    }

    /// Supplied coordinates are outside the venue's geofence.
    pub fn proximity_failed(radius_meters: i32) -> Self {
        Self::new(
            RejectionReason::ProximityFailed,
            format!(
                "Proximity check failed. You must be within {}m of the venue.",
                radius_meters
            ),
        )
    }
}

/// Machine-readable rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectionReason {
    #[serde(rename = "INACTIVE")]
    Inactive,
    #[serde(rename = "SERIES_ENDED")]
    SeriesEnded,
    #[serde(rename = "WRONG_DAY")]
    WrongDay,
    #[serde(rename = "NOT_STARTED")]
    NotStarted,
    #[serde(rename = "CLOSED")]
    Closed,
    #[serde(rename = "UPCOMING")]
    Upcoming,
    #[serde(rename = "EXPIRED")]
    Expired,
    #[serde(rename = "CAPACITY_REACHED")]
    CapacityReached,
    #[serde(rename = "LOCATION_REQUIRED")]
    LocationRequired,
    #[serde(rename = "PROXIMITY_FAILED")]
    ProximityFailed,
    #[serde(rename = "DUPLICATE")]
    Duplicate,
}

impl RejectionReason {
    /// Wire representation of the reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::Inactive => "INACTIVE",
            RejectionReason::SeriesEnded => "SERIES_ENDED",
            RejectionReason::WrongDay => "WRONG_DAY",
            RejectionReason::NotStarted => "NOT_STARTED",
            RejectionReason::Closed => "CLOSED",
            RejectionReason::Upcoming => "UPCOMING",
            RejectionReason::Expired => "EXPIRED",
            RejectionReason::CapacityReached => "CAPACITY_REACHED",
            RejectionReason::LocationRequired => "LOCATION_REQUIRED",
            RejectionReason::ProximityFailed => "PROXIMITY_FAILED",
            RejectionReason::Duplicate => "DUPLICATE",
        }
    }
}

/// Evaluates whether a portal admits check-ins at `now`.
///
/// Check order, first failure wins:
/// 1. kill switch (`is_active`)
/// 2. recurring: series end, pattern day match, time-of-day window
/// 3. single event: calendar date match, absolute start/end window
pub fn evaluate(portal: &Portal, now: DateTime<Utc>) -> Verdict {
    if !portal.is_active {
        return Verdict::Rejected(Rejection::new(
            RejectionReason::Inactive,
            "This check-in portal is currently inactive.",
        ));
    }

    if portal.is_recurring {
        evaluate_recurring(portal, now)
    } else {
        evaluate_single(portal, now)
    }
}

fn evaluate_recurring(portal: &Portal, now: DateTime<Utc>) -> Verdict {
    // The series end bound is inclusive of its whole final day.
    if let Some(end) = portal.recurrence_end {
        if now.date_naive() > end {
            return Verdict::Rejected(Rejection::new(
                RejectionReason::SeriesEnded,
                "This recurring event series has ended.",
            ));
        }
    }

    // Pattern day match against the anchor date. DAILY always matches.
    match portal.recurrence_pattern {
        Some(RecurrencePattern::Weekly) => {
            if now.date_naive().weekday() != portal.event_date.weekday() {
                let day = clock::weekday_name(portal.event_date);
                return Verdict::Rejected(Rejection::new(
                    RejectionReason::WrongDay,
                    format!("This event only takes place on {}s.", day),
                ));
            }
        }
        Some(RecurrencePattern::Monthly) => {
            if now.date_naive().day() != portal.event_date.day() {
                return Verdict::Rejected(Rejection::new(
                    RejectionReason::WrongDay,
                    format!(
                        "This event only takes place on the {} of each month.",
                        clock::ordinal(portal.event_date.day())
                    ),
                ));
            }
        }
        Some(RecurrencePattern::Daily) | None => {}
    }

    // Recurring portals compare time-of-day only; the stored times carry
    // no meaningful date component.
    let current_minutes = clock::minutes_of_day(now);

    if let Some(start) = portal.start_time {
        if current_minutes < clock::time_minutes(start) {
            return Verdict::Rejected(Rejection::new(
                RejectionReason::NotStarted,
                format!(
                    "Check-in for today's session hasn't started yet. Please come back at {}.",
                    start.format("%H:%M")
                ),
            ));
        }
    }

    if let Some(end) = portal.end_time {
        if current_minutes > clock::time_minutes(end) {
            return Verdict::Rejected(Rejection::new(
                RejectionReason::Closed,
                "Check-in for today's session has already closed.",
            ));
        }
    }

    Verdict::Active
}

fn evaluate_single(portal: &Portal, now: DateTime<Utc>) -> Verdict {
    if !clock::is_same_day(now, portal.event_date) {
        return if now.date_naive() < portal.event_date {
            Verdict::Rejected(Rejection::new(
                RejectionReason::Upcoming,
                format!(
                    "This event is scheduled for {}. Please come back then.",
                    portal.event_date.format("%B %-d, %Y")
                ),
            ))
        } else {
            Verdict::Rejected(Rejection::new(
                RejectionReason::Expired,
                "The check-in period for this event has expired.",
            ))
        };
    }

    // On the event day the window bounds are absolute timestamps.
    if let Some(start) = portal.start_time {
        if now < clock::at_time(portal.event_date, start) {
            return Verdict::Rejected(Rejection::new(
                RejectionReason::NotStarted,
                format!(
                    "Check-in hasn't opened yet. It starts at {}.",
                    start.format("%H:%M")
                ),
            ));
        }
    }

    if let Some(end) = portal.end_time {
        if now > clock::at_time(portal.event_date, end) {
            return Verdict::Rejected(Rejection::new(
                RejectionReason::Closed,
                "The check-in window for this event has closed.",
            ));
        }
    }

    Verdict::Active
}
