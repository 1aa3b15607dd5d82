// crates/trip-planner-server/src/plan.rs
// ============================================================================
// Module: Plan Trip Handler
// Description: Request parsing, routing, and simulation for plan requests.
// Purpose: Map one request body to an HTTP status and JSON payload.
// Dependencies: trip-planner-core, serde_json, time
// ============================================================================

//! ## Overview
//! [`plan_trip`] is transport-independent: it takes raw body bytes and
//! returns the status and JSON body to send. It performs a blocking route
//! lookup, so async callers must run it on a blocking thread.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use trip_planner_core::Coordinate;
use trip_planner_core::LocationInput;
use trip_planner_core::RouteError;
use trip_planner_core::TripError;
use trip_planner_core::TripPlan;
use trip_planner_core::simulate_trip;

use crate::audit::PlanAuditEvent;
use crate::audit::PlanOutcome;
use crate::server::ServerState;

// ============================================================================
// SECTION: Request
// ============================================================================

/// Plan trip request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanTripRequest {
    /// Driver's current location.
    pub current_location: LocationInput,
    /// Pickup location.
    pub pickup_location: LocationInput,
    /// Dropoff location.
    pub dropoff_location: LocationInput,
    /// Hours already used in the current cycle.
    pub current_cycle_used: CycleHours,
    /// Trip start; defaults to the time the request is handled.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
}

/// Cycle hours as sent by clients: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CycleHours {
    /// JSON number.
    Number(f64),
    /// Numeric string such as `"12.5"`.
    Text(String),
}

impl CycleHours {
    /// Returns the numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidRequest`] when the text is not a finite number.
    pub fn hours(&self) -> Result<f64, PlanError> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                PlanError::InvalidRequest("current_cycle_used must be a number".to_string())
            })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PlanError::InvalidRequest("current_cycle_used must be finite".to_string()))
        }
    }
}

impl PlanTripRequest {
    /// Resolves the three locations in travel order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidRequest`] naming the first bad location.
    pub fn waypoints(&self) -> Result<[Coordinate; 3], PlanError> {
        let resolve = |field: &str, input: &LocationInput| {
            input
                .resolve()
                .map_err(|err| PlanError::InvalidRequest(format!("invalid {field}: {err}")))
        };
        Ok([
            resolve("current_location", &self.current_location)?,
            resolve("pickup_location", &self.pickup_location)?,
            resolve("dropoff_location", &self.dropoff_location)?,
        ])
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Plan request failures.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Body exceeds the configured limit.
    #[error("request body too large")]
    BodyTooLarge,
    /// Body is not a valid plan request.
    #[error("{0}")]
    InvalidRequest(String),
    /// Route provider failed.
    #[error("failed to get route")]
    Route(RouteError),
    /// Simulation failed.
    #[error(transparent)]
    Trip(#[from] TripError),
    /// Plan could not be serialized.
    #[error("plan serialization failed")]
    Serialization,
}

impl PlanError {
    /// HTTP status for the failure.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidRequest(_) | Self::Route(_) | Self::Trip(TripError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Trip(_) | Self::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Audit outcome for the failure.
    #[must_use]
    pub const fn outcome(&self) -> PlanOutcome {
        match self {
            Self::BodyTooLarge | Self::InvalidRequest(_) | Self::Trip(TripError::InvalidInput(_)) => {
                PlanOutcome::Rejected
            }
            Self::Route(_) => PlanOutcome::RouteFailed,
            Self::Trip(_) | Self::Serialization => PlanOutcome::Error,
        }
    }

    /// Detail recorded in the audit log.
    fn audit_detail(&self) -> String {
        match self {
            Self::Route(err) => format!("failed to get route: {err}"),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Handler
// ============================================================================

/// Handles one plan request body and records an audit event.
///
/// `now` is the start time used when the request does not carry one.
#[must_use]
pub fn plan_trip(
    state: &ServerState,
    peer: Option<IpAddr>,
    body: &[u8],
    now: OffsetDateTime,
) -> (StatusCode, Value) {
    let result = build_plan(state, body, now).and_then(|plan| {
        let payload = serde_json::to_value(&plan).map_err(|_| PlanError::Serialization)?;
        Ok((plan, payload))
    });
    respond(state, peer, body.len(), now, result)
}

/// Answers a request whose body could not be read and records an audit event.
///
/// `request_bytes` is the declared body length when the client sent one.
#[must_use]
pub fn reject_body(
    state: &ServerState,
    peer: Option<IpAddr>,
    error: PlanError,
    request_bytes: usize,
    now: OffsetDateTime,
) -> (StatusCode, Value) {
    respond(state, peer, request_bytes, now, Err(error))
}

/// Builds the response and audit event for a finished request.
fn respond(
    state: &ServerState,
    peer: Option<IpAddr>,
    request_bytes: usize,
    now: OffsetDateTime,
    result: Result<(TripPlan, Value), PlanError>,
) -> (StatusCode, Value) {
    let mut event = PlanAuditEvent {
        event: "plan_trip",
        timestamp_ms: now.unix_timestamp_nanos() / 1_000_000,
        peer_ip: peer.map(|ip| ip.to_string()),
        outcome: PlanOutcome::Ok,
        status: StatusCode::OK.as_u16(),
        error: None,
        request_bytes,
        distance_miles: None,
        total_hours: None,
        stops: None,
    };
    let response = match result {
        Ok((plan, payload)) => {
            event.distance_miles = Some(plan.distance_miles);
            event.total_hours = Some(plan.total_hours);
            event.stops = Some(plan.stops.len());
            (StatusCode::OK, payload)
        }
        Err(err) => {
            let status = err.status();
            event.outcome = err.outcome();
            event.status = status.as_u16();
            event.error = Some(err.audit_detail());
            (status, json!({ "error": err.to_string() }))
        }
    };
    state.audit.record(&event);
    response
}

/// Parses, routes, and simulates.
fn build_plan(state: &ServerState, body: &[u8], now: OffsetDateTime) -> Result<TripPlan, PlanError> {
    if body.len() > state.max_body_bytes {
        return Err(PlanError::BodyTooLarge);
    }
    let request: PlanTripRequest = serde_json::from_slice(body)
        .map_err(|err| PlanError::InvalidRequest(format!("invalid request: {err}")))?;
    let waypoints = request.waypoints()?;
    let cycle_used = request.current_cycle_used.hours()?;
    if !(0.0..=state.rules.cycle_limit_hours).contains(&cycle_used) {
        return Err(PlanError::InvalidRequest(format!(
            "current_cycle_used must be within [0, {}]",
            state.rules.cycle_limit_hours
        )));
    }
    let route = state.provider.route(&waypoints).map_err(PlanError::Route)?;
    let start = request.start_time.unwrap_or(now);
    Ok(simulate_trip(&route, cycle_used, start, &state.rules)?)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
