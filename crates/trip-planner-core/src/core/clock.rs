// crates/trip-planner-core/src/core/clock.rs
// ============================================================================
// Module: Trip Planner Time Helpers
// Description: Fractional-hour arithmetic over explicit timestamps.
// Purpose: Keep the simulator free of wall-clock reads.
// Dependencies: time
// ============================================================================

//! ## Overview
//! The simulator never reads wall-clock time; hosts pass the trip start
//! explicitly. These helpers convert between fractional hours and
//! [`time::OffsetDateTime`] without silent overflow.

use time::Duration;
use time::OffsetDateTime;

use crate::runtime::TripError;

/// Adds fractional hours to a timestamp.
///
/// # Errors
///
/// Returns [`TripError::TimeOverflow`] when `hours` is not finite or the sum
/// leaves the representable range.
pub fn add_hours(start: OffsetDateTime, hours: f64) -> Result<OffsetDateTime, TripError> {
    if !hours.is_finite() {
        return Err(TripError::TimeOverflow);
    }
    let delta = Duration::checked_seconds_f64(hours * 3600.0).ok_or(TripError::TimeOverflow)?;
    start.checked_add(delta).ok_or(TripError::TimeOverflow)
}

/// Returns the signed number of hours from `start` to `end`.
#[must_use]
pub fn hours_between(start: OffsetDateTime, end: OffsetDateTime) -> f64 {
    (end - start).as_seconds_f64() / 3600.0
}
