// crates/trip-planner-server/tests/common/mod.rs
// =============================================================================
// Module: Server Test Helpers
// Description: Stub route provider and recording audit sink.
// Purpose: Exercise the API without network access.
// =============================================================================

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test helpers are selectively used across suites."
)]

use std::sync::Arc;
use std::sync::Mutex;

use trip_planner_core::Coordinate;
use trip_planner_core::GeoPoint;
use trip_planner_core::HosRules;
use trip_planner_core::Route;
use trip_planner_core::RouteError;
use trip_planner_core::RouteProvider;
use trip_planner_server::PlanAuditEvent;
use trip_planner_server::PlanAuditSink;
use trip_planner_server::ServerState;

/// Route provider returning a fixed answer and recording requested waypoints.
pub struct StubProvider {
    /// Answer for every lookup.
    answer: Result<Route, RouteError>,
    /// Waypoints of each lookup.
    pub calls: Mutex<Vec<Vec<Coordinate>>>,
}

impl StubProvider {
    pub fn ok(route: Route) -> Self {
        Self {
            answer: Ok(route),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: RouteError) -> Self {
        Self {
            answer: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl RouteProvider for StubProvider {
    fn route(&self, waypoints: &[Coordinate]) -> Result<Route, RouteError> {
        self.calls.lock().unwrap().push(waypoints.to_vec());
        self.answer.clone()
    }
}

/// Audit sink keeping events in memory.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<PlanAuditEvent>>,
}

impl RecordingSink {
    pub fn last(&self) -> PlanAuditEvent {
        self.events.lock().unwrap().last().cloned().expect("audit event recorded")
    }
}

impl PlanAuditSink for RecordingSink {
    fn record(&self, event: &PlanAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// 600 miles over 10 hours through three points.
pub fn sample_route() -> Route {
    Route {
        geometry: vec![
            GeoPoint([-74.006, 40.7128]),
            GeoPoint([-75.1652, 39.9526]),
            GeoPoint([-77.0369, 38.9072]),
        ],
        distance_miles: 600.0,
        duration_hours: 10.0,
    }
}

/// Builds handler state around `provider`.
pub fn state_with(
    provider: Arc<StubProvider>,
    audit: Arc<RecordingSink>,
    max_body_bytes: usize,
) -> ServerState {
    ServerState {
        provider,
        rules: HosRules::default(),
        max_body_bytes,
        audit,
    }
}
