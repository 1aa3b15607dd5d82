// crates/trip-planner-routing/src/osrm.rs
// ============================================================================
// Module: OSRM Route Provider
// Description: Route provider backed by the OSRM HTTP route service.
// Purpose: Fetch driving routes with bounded, fail-closed HTTP requests.
// Dependencies: trip-planner-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! [`OsrmRouteProvider`] issues one bounded GET per lookup against
//! `{base_url}/route/v1/{profile}/{lon,lat;...}` and converts the first
//! returned route to miles and hours. Redirects are not followed and response
//! bodies are read through a hard byte limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Deserialize;
use trip_planner_core::Coordinate;
use trip_planner_core::GeoPoint;
use trip_planner_core::Route;
use trip_planner_core::RouteError;
use trip_planner_core::RouteProvider;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Public OSRM demo server.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
/// Minimum allowed request timeout.
pub const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed request timeout.
pub const MAX_TIMEOUT_MS: u64 = 60_000;
/// Hard ceiling for configured response limits.
pub const MAX_RESPONSE_BYTES_CEILING: usize = 64 * 1024 * 1024;

/// Configuration for the OSRM provider.
///
/// # Invariants
/// - `base_url` is `http` or `https` and carries no credentials.
/// - `timeout_ms` applies to the full request lifecycle.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OsrmConfig {
    /// Service root, without the `/route/v1` suffix.
    pub base_url: String,
    /// Routing profile segment.
    pub profile: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_BASE_URL.to_string(),
            profile: "driving".to_string(),
            timeout_ms: 10_000,
            max_response_bytes: 8 * 1024 * 1024,
            user_agent: "trip-planner/0.1".to_string(),
        }
    }
}

impl OsrmConfig {
    /// Validates limits and parses the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidRequest`] describing the first violation.
    pub fn validate(&self) -> Result<Url, RouteError> {
        let base = Url::parse(&self.base_url)
            .map_err(|_| invalid(format!("invalid osrm base_url: {}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid("osrm base_url must use http or https".to_string()));
        }
        if !base.username().is_empty() || base.password().is_some() {
            return Err(invalid("osrm base_url credentials are not allowed".to_string()));
        }
        if base.host_str().is_none() {
            return Err(invalid("osrm base_url host required".to_string()));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("osrm base_url must not carry a query or fragment".to_string()));
        }
        let profile_ok = !self.profile.is_empty()
            && self.profile.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !profile_ok {
            return Err(invalid("osrm profile must be a non-empty identifier".to_string()));
        }
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(invalid(format!(
                "osrm timeout_ms must be within [{MIN_TIMEOUT_MS}, {MAX_TIMEOUT_MS}]"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES_CEILING {
            return Err(invalid(format!(
                "osrm max_response_bytes must be within (0, {MAX_RESPONSE_BYTES_CEILING}]"
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(invalid("osrm user_agent must not be empty".to_string()));
        }
        Ok(base)
    }
}

// ============================================================================
// SECTION: Provider Implementation
// ============================================================================

/// Route provider for the OSRM `route` service.
///
/// # Invariants
/// - At least two waypoints are required per lookup.
/// - Redirects are not followed.
/// - Responses exceeding configured limits fail closed.
pub struct OsrmRouteProvider {
    /// Provider configuration.
    config: OsrmConfig,
    /// Parsed service root.
    base: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl OsrmRouteProvider {
    /// Creates a provider from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: OsrmConfig) -> Result<Self, RouteError> {
        let base = config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| RouteError::Transport("http client build failed".to_string()))?;
        Ok(Self {
            config,
            base,
            client,
        })
    }

    /// Builds the route request URL for `waypoints`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidRequest`] for fewer than two waypoints.
    pub fn route_url(&self, waypoints: &[Coordinate]) -> Result<Url, RouteError> {
        if waypoints.len() < 2 {
            return Err(invalid("at least two waypoints are required".to_string()));
        }
        let coordinates = waypoints
            .iter()
            .map(|point| {
                let point = point.to_geo_point();
                format!("{},{}", point.lon(), point.lat())
            })
            .collect::<Vec<_>>()
            .join(";");
        let root = self.base.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!(
            "{root}/route/v1/{}/{coordinates}",
            self.config.profile
        ))
        .map_err(|_| invalid("route url could not be built".to_string()))?;
        url.query_pairs_mut().append_pair("overview", "full").append_pair("geometries", "geojson");
        Ok(url)
    }
}

impl RouteProvider for OsrmRouteProvider {
    fn route(&self, waypoints: &[Coordinate]) -> Result<Route, RouteError> {
        let url = self.route_url(waypoints)?;
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| RouteError::Transport(transport_reason(&err)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::Upstream {
                status: status.as_u16(),
            });
        }
        let body = read_response_limited(&mut response, self.config.max_response_bytes)?;
        decode_route(&body)
    }
}

// ============================================================================
// SECTION: Response Decoding
// ============================================================================

/// Top-level OSRM `route` response.
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    /// Service status code (`Ok`, `NoRoute`, ...).
    #[serde(default)]
    code: Option<String>,
    /// Candidate routes, best first.
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

/// One OSRM route.
#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// GeoJSON line string.
    geometry: OsrmGeometry,
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[lon, lat]` pairs.
    coordinates: Vec<GeoPoint>,
}

/// Decodes an OSRM response body into a [`Route`].
///
/// # Errors
///
/// Returns [`RouteError::Decode`] for malformed bodies and
/// [`RouteError::NoRoute`] when no route is present.
pub fn decode_route(body: &[u8]) -> Result<Route, RouteError> {
    let response: OsrmResponse = serde_json::from_slice(body)
        .map_err(|err| RouteError::Decode(format!("invalid osrm response: {err}")))?;
    if response.code.as_deref().is_some_and(|code| code != "Ok") {
        return Err(RouteError::NoRoute);
    }
    let first = response.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
    let route = Route::from_metric(first.geometry.coordinates, first.distance, first.duration);
    route.validate().map_err(|err| RouteError::Decode(err.to_string()))?;
    Ok(route)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an invalid-request error.
fn invalid(reason: String) -> RouteError {
    RouteError::InvalidRequest(reason)
}

/// Classifies transport failures without leaking request URLs.
fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "route request timed out".to_string()
    } else if err.is_connect() {
        "route service connection failed".to_string()
    } else {
        "route request failed".to_string()
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, RouteError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes).map_err(|_| RouteError::ResponseTooLarge)?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(RouteError::ResponseTooLarge);
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle
        .read_to_end(&mut buf)
        .map_err(|_| RouteError::Transport("failed to read route response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(RouteError::ResponseTooLarge);
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| RouteError::Decode("invalid response length".to_string()))?;
        if buf.len() < expected {
            return Err(RouteError::Transport("route response truncated".to_string()));
        }
    }
    Ok(buf)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
