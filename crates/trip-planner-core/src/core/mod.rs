// crates/trip-planner-core/src/core/mod.rs
// ============================================================================
// Module: Trip Planner Core Types
// Description: Domain model for locations, routes, duty status, and HOS rules.
// Purpose: Provide serializable, validated types shared by every crate.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Core types carry no I/O. Validation lives next to each type so that the
//! simulator, the HTTP API, and the CLI reject the same inputs.

pub mod clock;
pub mod duty;
pub mod geo;
pub mod hos;
pub mod route;

pub use clock::add_hours;
pub use clock::hours_between;
pub use duty::Activity;
pub use duty::DutyStatus;
pub use duty::Stop;
pub use duty::StopKind;
pub use geo::Coordinate;
pub use geo::CoordinateError;
pub use geo::GeoPoint;
pub use geo::LocationInput;
pub use geo::Polyline;
pub use geo::haversine_miles;
pub use hos::HosRules;
pub use route::METERS_PER_MILE;
pub use route::Route;
pub use route::SECONDS_PER_HOUR;
