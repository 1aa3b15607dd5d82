// crates/trip-planner-server/src/lib.rs
// ============================================================================
// Module: Trip Planner Server
// Description: HTTP API for trip planning.
// Purpose: Serve route-backed HOS trip plans over JSON.
// Dependencies: axum, tokio, trip-planner-core, trip-planner-config
// ============================================================================

//! ## Overview
//! The server accepts `POST /api/plan-trip` with current, pickup, and dropoff
//! locations plus the driver's used cycle hours, fetches a route, and returns
//! the simulated plan. Errors are JSON objects with a single `error` field.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod plan;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PlanAuditEvent;
pub use audit::PlanAuditSink;
pub use audit::PlanOutcome;
pub use audit::StderrAuditSink;
pub use audit::audit_sink_from_config;
pub use plan::CycleHours;
pub use plan::PlanError;
pub use plan::PlanTripRequest;
pub use plan::plan_trip;
pub use plan::reject_body;
pub use server::ServerError;
pub use server::ServerState;
pub use server::TripPlannerServer;
pub use server::build_router;
