// crates/trip-planner-core/src/core/duty.rs
// ============================================================================
// Module: Trip Planner Duty Records
// Description: Duty statuses, timeline activities, and planned stops.
// Purpose: Define the records a simulated trip produces.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A trip is a contiguous timeline of [`Activity`] records, one duty status
//! each, plus the [`Stop`] list a driver sees on the map.

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::geo::GeoPoint;

// ============================================================================
// SECTION: Duty Status
// ============================================================================

/// Driver duty status as drawn on a daily log grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyStatus {
    /// Off duty.
    OffDuty,
    /// Sleeper berth. Never produced by the simulator.
    SleeperBerth,
    /// Driving.
    Driving,
    /// On duty, not driving (pickup, dropoff, fueling).
    OnDutyNotDriving,
}

impl DutyStatus {
    /// All statuses in log-grid row order.
    pub const ALL: [Self; 4] =
        [Self::OffDuty, Self::SleeperBerth, Self::Driving, Self::OnDutyNotDriving];
}

// ============================================================================
// SECTION: Activity
// ============================================================================

/// One contiguous span of a single duty status.
///
/// # Invariants
/// - `start_time <= end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Span start.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Span end.
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Duty status for the span.
    pub status: DutyStatus,
}

impl Activity {
    /// Span length in hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        crate::core::clock::hours_between(self.start_time, self.end_time)
    }
}

// ============================================================================
// SECTION: Stops
// ============================================================================

/// Why the driver stops along the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    /// Short break after continuous driving.
    RestBreak,
    /// Refueling stop.
    Fueling,
    /// Mandatory daily off-duty period.
    OffDuty,
    /// Cycle reset after exhausting the multi-day limit.
    CycleReset,
}

impl StopKind {
    /// Human-readable reason shown to drivers.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::RestBreak => "30-minute rest break",
            Self::Fueling => "Fueling stop",
            Self::OffDuty => "10-hour off-duty period",
            Self::CycleReset => "34-hour cycle reset",
        }
    }
}

/// A planned stop along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Hours elapsed since trip start when the stop begins.
    pub time: f64,
    /// Position on the route geometry (`[lon, lat]`).
    pub location: GeoPoint,
    /// Stop classification.
    pub kind: StopKind,
    /// Human-readable reason.
    pub reason: String,
    /// Stop length in hours.
    pub duration_hours: f64,
}
