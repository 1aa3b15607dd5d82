// crates/trip-planner-core/src/runtime/mod.rs
// ============================================================================
// Module: Trip Planner Runtime
// Description: HOS trip simulation and daily log construction.
// Purpose: Turn a route and a driver's cycle state into a compliant plan.
// Dependencies: crate::core, time, thiserror
// ============================================================================

//! ## Overview
//! [`simulate_trip`] walks the route under [`crate::HosRules`], emitting duty
//! activities and stops. [`build_daily_logs`] folds the activities into one
//! log sheet per calendar day.

pub mod logs;
pub mod simulator;

use thiserror::Error;

pub use logs::DailyLog;
pub use logs::DailyLogEntry;
pub use logs::StatusTotals;
pub use logs::build_daily_logs;
pub use simulator::TripPlan;
pub use simulator::TripState;
pub use simulator::simulate_trip;

/// Trip simulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    /// Route or driver input is invalid.
    #[error("invalid trip input: {0}")]
    InvalidInput(String),
    /// HOS rule configuration is invalid.
    #[error("invalid hos rules: {0}")]
    InvalidRules(String),
    /// Timestamp arithmetic left the representable range.
    #[error("trip timeline overflows the supported time range")]
    TimeOverflow,
}
