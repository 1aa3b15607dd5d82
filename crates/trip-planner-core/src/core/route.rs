// crates/trip-planner-core/src/core/route.rs
// ============================================================================
// Module: Trip Planner Route Model
// Description: Driving route geometry with distance and duration totals.
// Purpose: Provider-neutral route representation consumed by the simulator.
// Dependencies: serde
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::geo::GeoPoint;
use crate::runtime::TripError;

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;
/// Seconds in one hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Driving route returned by a route provider.
///
/// # Invariants
/// - `geometry` is non-empty after [`Route::validate`].
/// - `distance_miles` and `duration_hours` are finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route polyline in `[lon, lat]` order.
    pub geometry: Vec<GeoPoint>,
    /// Road distance in miles.
    #[serde(rename = "distance")]
    pub distance_miles: f64,
    /// Provider-estimated driving time in hours.
    #[serde(rename = "duration")]
    pub duration_hours: f64,
}

impl Route {
    /// Builds a route from provider units (meters and seconds).
    #[must_use]
    pub fn from_metric(geometry: Vec<GeoPoint>, meters: f64, seconds: f64) -> Self {
        Self {
            geometry,
            distance_miles: meters / METERS_PER_MILE,
            duration_hours: seconds / SECONDS_PER_HOUR,
        }
    }

    /// Validates the route before simulation.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::InvalidInput`] when geometry is empty or totals are
    /// negative or non-finite.
    pub fn validate(&self) -> Result<(), TripError> {
        if self.geometry.is_empty() {
            return Err(TripError::InvalidInput("route geometry must not be empty".to_string()));
        }
        if self.geometry.iter().any(|point| !point.lon().is_finite() || !point.lat().is_finite()) {
            return Err(TripError::InvalidInput("route geometry must be finite".to_string()));
        }
        if !self.distance_miles.is_finite() || self.distance_miles < 0.0 {
            return Err(TripError::InvalidInput(
                "route distance must be finite and >= 0".to_string(),
            ));
        }
        if !self.duration_hours.is_finite() || self.duration_hours < 0.0 {
            return Err(TripError::InvalidInput(
                "route duration must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
