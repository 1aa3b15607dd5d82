// crates/trip-planner-core/src/interfaces/mod.rs
// ============================================================================
// Module: Trip Planner Interfaces
// Description: Backend-agnostic interface for route lookup.
// Purpose: Define the contract surface used by the server and CLI.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Route providers translate waypoints into a [`Route`]. Implementations must
//! fail closed: a missing or malformed upstream answer is an error, never an
//! empty route.

use thiserror::Error;

use crate::core::geo::Coordinate;
use crate::core::route::Route;

// ============================================================================
// SECTION: Route Provider
// ============================================================================

/// Route lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Request could not be built from the waypoints.
    #[error("invalid route request: {0}")]
    InvalidRequest(String),
    /// Network or client failure.
    #[error("route transport error: {0}")]
    Transport(String),
    /// Upstream answered with a non-success status.
    #[error("route service returned status {status}")]
    Upstream {
        /// HTTP status code.
        status: u16,
    },
    /// Upstream answered without a usable route.
    #[error("no route found")]
    NoRoute,
    /// Upstream body could not be decoded.
    #[error("route decode error: {0}")]
    Decode(String),
    /// Upstream body exceeded the configured limit.
    #[error("route response exceeds size limit")]
    ResponseTooLarge,
}

/// Backend-agnostic driving route lookup.
pub trait RouteProvider: Send + Sync {
    /// Returns a driving route through the waypoints, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when no route can be produced.
    fn route(&self, waypoints: &[Coordinate]) -> Result<Route, RouteError>;
}
