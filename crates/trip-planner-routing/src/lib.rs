// crates/trip-planner-routing/src/lib.rs
// ============================================================================
// Module: Trip Planner Routing
// Description: Route providers for the trip planner.
// Purpose: Resolve waypoints to driving routes over bounded HTTP.
// Dependencies: trip-planner-core, reqwest, serde
// ============================================================================

//! ## Overview
//! This crate ships the OSRM-backed [`trip_planner_core::RouteProvider`].
//! Providers enforce scheme, redirect, timeout, and size limits and fail
//! closed on any upstream anomaly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod osrm;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use osrm::DEFAULT_OSRM_BASE_URL;
pub use osrm::OsrmConfig;
pub use osrm::OsrmRouteProvider;
pub use osrm::decode_route;
