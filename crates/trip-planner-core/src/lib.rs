// crates/trip-planner-core/src/lib.rs
// ============================================================================
// Module: Trip Planner Core Library
// Description: Public API surface for the Trip Planner core.
// Purpose: Expose domain types, routing interfaces, and the HOS simulator.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Trip Planner core simulates a truck trip under hours-of-service rules. It
//! is backend-agnostic: routes come in through [`RouteProvider`] and the
//! caller supplies the trip start time, so simulation is deterministic and
//! replayable.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::RouteError;
pub use interfaces::RouteProvider;
pub use runtime::DailyLog;
pub use runtime::DailyLogEntry;
pub use runtime::StatusTotals;
pub use runtime::TripError;
pub use runtime::TripPlan;
pub use runtime::TripState;
pub use runtime::build_daily_logs;
pub use runtime::simulate_trip;
