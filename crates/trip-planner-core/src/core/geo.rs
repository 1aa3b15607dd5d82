// crates/trip-planner-core/src/core/geo.rs
// ============================================================================
// Module: Trip Planner Geography
// Description: Coordinates, location inputs, and polyline measurement.
// Purpose: Parse untrusted location inputs and place stops along a route.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Locations arrive as `"lat,lon"` strings or `[lat, lon]` arrays. Route
//! geometry uses GeoJSON `[lon, lat]` order. Distances along geometry are
//! great-circle miles.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

// ============================================================================
// SECTION: Coordinate
// ============================================================================

/// Validated latitude/longitude pair in decimal degrees.
///
/// # Invariants
/// - `lat` is finite and within [-90, 90].
/// - `lon` is finite and within [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Builds a coordinate after range validation.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either value is non-finite or out of range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::OutOfRange(format!("latitude {lat} outside [-90, 90]")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::OutOfRange(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        Ok(Self {
            lat,
            lon,
        })
    }

    /// Parses a `"lat,lon"` string.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when the text is malformed or out of range.
    pub fn parse_lat_lon(text: &str) -> Result<Self, CoordinateError> {
        let mut parts = text.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoordinateError::Malformed(format!("expected \"lat,lon\", got {text:?}")));
        };
        let lat = parse_degrees(lat)?;
        let lon = parse_degrees(lon)?;
        Self::new(lat, lon)
    }

    /// Returns the coordinate as a GeoJSON point (`[lon, lat]`).
    #[must_use]
    pub const fn to_geo_point(self) -> GeoPoint {
        GeoPoint([self.lon, self.lat])
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse_lat_lon(text)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parses one decimal-degree component.
fn parse_degrees(text: &str) -> Result<f64, CoordinateError> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| CoordinateError::Malformed(format!("invalid degree value {trimmed:?}")))
}

/// Coordinate parsing and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// Input text or array shape was not a coordinate.
    #[error("malformed coordinate: {0}")]
    Malformed(String),
    /// Values parsed but fall outside valid degree ranges.
    #[error("coordinate out of range: {0}")]
    OutOfRange(String),
}

// ============================================================================
// SECTION: Location Input
// ============================================================================

/// Location as accepted on the wire: `"lat,lon"` or `[lat, lon]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocationInput {
    /// Comma-separated text form.
    Text(String),
    /// Two-element array form.
    Pair([f64; 2]),
}

impl LocationInput {
    /// Resolves the input into a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when the input is malformed or out of range.
    pub fn resolve(&self) -> Result<Coordinate, CoordinateError> {
        match self {
            Self::Text(text) => Coordinate::parse_lat_lon(text),
            Self::Pair([lat, lon]) => Coordinate::new(*lat, *lon),
        }
    }
}

// ============================================================================
// SECTION: Geometry
// ============================================================================

/// GeoJSON position in `[lon, lat]` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoPoint(pub [f64; 2]);

impl GeoPoint {
    /// Longitude component.
    #[must_use]
    pub const fn lon(self) -> f64 {
        self.0[0]
    }

    /// Latitude component.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.0[1]
    }
}

/// Great-circle distance between two points in miles.
#[must_use]
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

/// Borrowed view over route geometry for distance lookups.
#[derive(Debug, Clone, Copy)]
pub struct Polyline<'a> {
    /// Ordered route points.
    points: &'a [GeoPoint],
}

impl<'a> Polyline<'a> {
    /// Wraps a slice of points.
    #[must_use]
    pub const fn new(points: &'a [GeoPoint]) -> Self {
        Self {
            points,
        }
    }

    /// Total great-circle length in miles.
    #[must_use]
    pub fn length_miles(&self) -> f64 {
        self.points.windows(2).map(|pair| haversine_miles(pair[0], pair[1])).sum()
    }

    /// Returns the point at `fraction` of the total length.
    ///
    /// The fraction is clamped to [0, 1] and the result is interpolated
    /// linearly inside the segment that crosses the target distance. Returns
    /// `None` only for an empty polyline.
    #[must_use]
    pub fn point_at_fraction(&self, fraction: f64) -> Option<GeoPoint> {
        let first = *self.points.first()?;
        let total = self.length_miles();
        if total <= 0.0 || !fraction.is_finite() {
            return Some(first);
        }
        let target = fraction.clamp(0.0, 1.0) * total;
        let mut walked = 0.0;
        for pair in self.points.windows(2) {
            let segment = haversine_miles(pair[0], pair[1]);
            if walked + segment >= target {
                if segment <= 0.0 {
                    return Some(pair[0]);
                }
                let t = (target - walked) / segment;
                let lon = pair[0].lon() + (pair[1].lon() - pair[0].lon()) * t;
                let lat = pair[0].lat() + (pair[1].lat() - pair[0].lat()) * t;
                return Some(GeoPoint([lon, lat]));
            }
            walked += segment;
        }
        self.points.last().copied()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        reason = "Test-only assertions."
    )]

    use super::Coordinate;
    use super::GeoPoint;
    use super::LocationInput;
    use super::Polyline;
    use super::haversine_miles;

    #[test]
    fn parse_lat_lon_trims_whitespace() {
        let coord = Coordinate::parse_lat_lon(" 40.7128 , -74.0060 ").unwrap();
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lon, -74.006);
    }

    #[test]
    fn parse_lat_lon_rejects_extra_parts() {
        assert!(Coordinate::parse_lat_lon("1,2,3").is_err());
        assert!(Coordinate::parse_lat_lon("1").is_err());
        assert!(Coordinate::parse_lat_lon("north,west").is_err());
    }

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn geo_point_swaps_to_lon_lat_order() {
        let point = Coordinate::new(40.7128, -74.006).unwrap().to_geo_point();
        assert_eq!(point, GeoPoint([-74.006, 40.7128]));
    }

    #[test]
    fn location_input_accepts_both_wire_forms() {
        let text: LocationInput = serde_json::from_str("\"31.71879,-8.09695\"").unwrap();
        let pair: LocationInput = serde_json::from_str("[31.71879, -8.09695]").unwrap();
        assert_eq!(text.resolve().unwrap(), pair.resolve().unwrap());
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let miles = haversine_miles(GeoPoint([0.0, 0.0]), GeoPoint([0.0, 1.0]));
        assert!((miles - 69.09).abs() < 0.1, "got {miles}");
    }

    #[test]
    fn point_at_fraction_interpolates_midpoint() {
        let points = [GeoPoint([0.0, 0.0]), GeoPoint([0.0, 2.0])];
        let mid = Polyline::new(&points).point_at_fraction(0.5).unwrap();
        assert!((mid.lat() - 1.0).abs() < 1e-9);
        assert!(mid.lon().abs() < 1e-9);
    }

    #[test]
    fn point_at_fraction_clamps_and_handles_degenerate_lines() {
        let points = [GeoPoint([1.0, 1.0]), GeoPoint([2.0, 2.0])];
        let line = Polyline::new(&points);
        assert_eq!(line.point_at_fraction(-3.0), Some(points[0]));
        assert_eq!(line.point_at_fraction(7.0), Some(points[1]));
        let single = [GeoPoint([5.0, 5.0])];
        assert_eq!(Polyline::new(&single).point_at_fraction(0.4), Some(single[0]));
        assert_eq!(Polyline::new(&[]).point_at_fraction(0.4), None);
    }
}
