// crates/trip-planner-server/src/server.rs
// ============================================================================
// Module: Trip Planner HTTP Server
// Description: axum transport for the plan-trip API.
// Purpose: Bind, route, and dispatch requests to the plan handler.
// Dependencies: axum, tokio, trip-planner-config, trip-planner-routing
// ============================================================================

//! ## Overview
//! Exposes `POST /api/plan-trip` and `GET /health`. Plan bodies are capped at
//! `max_body_bytes` by the body limit layer; oversized bodies get the same JSON
//! 413 and audit event as any other rejection. Accepted bodies are handled on
//! a blocking thread because route lookups use a blocking HTTP client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::CONTENT_LENGTH;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use serde_json::json;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use trip_planner_config::TripPlannerConfig;
use trip_planner_core::HosRules;
use trip_planner_core::RouteProvider;
use trip_planner_routing::OsrmRouteProvider;

use crate::audit::PlanAuditSink;
use crate::audit::audit_sink_from_config;
use crate::plan::PlanError;
use crate::plan::plan_trip;
use crate::plan::reject_body;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state for request handlers.
pub struct ServerState {
    /// Route lookup backend.
    pub provider: Arc<dyn RouteProvider>,
    /// HOS rules applied to every plan.
    pub rules: HosRules,
    /// Maximum allowed request body size.
    pub max_body_bytes: usize,
    /// Audit sink for plan requests.
    pub audit: Arc<dyn PlanAuditSink>,
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Trip planner HTTP server instance.
pub struct TripPlannerServer {
    /// Address to bind.
    bind: SocketAddr,
    /// Handler state.
    state: Arc<ServerState>,
}

impl TripPlannerServer {
    /// Builds a server from validated configuration.
    ///
    /// Constructs a blocking HTTP client, so call it outside async contexts
    /// (for example from `spawn_blocking`).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when initialization fails.
    pub fn from_config(config: &TripPlannerConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let provider = OsrmRouteProvider::new(config.routing.clone())
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let audit = audit_sink_from_config(&config.audit)
            .map_err(|err| ServerError::Init(format!("audit log: {err}")))?;
        emit_public_bind_warning(bind);
        Ok(Self::new(
            bind,
            ServerState {
                provider: Arc::new(provider),
                rules: config.hos.clone(),
                max_body_bytes: config.server.max_body_bytes,
                audit,
            },
        ))
    }

    /// Builds a server around explicit state.
    #[must_use]
    pub fn new(bind: SocketAddr, state: ServerState) -> Self {
        Self {
            bind,
            state: Arc::new(state),
        }
    }

    /// Returns the configured bind address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Returns the axum router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves until the process stops.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        self.serve_listener(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when serving fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the API router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/api/plan-trip", post(handle_plan_trip))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles plan requests on a blocking thread.
///
/// Bodies the extractor refuses (over the limit or unreadable) are answered
/// and audited here without reaching the planner.
async fn handle_plan_trip(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let now = OffsetDateTime::now_utc();
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                PlanError::BodyTooLarge
            } else {
                PlanError::InvalidRequest("failed to read request body".to_string())
            };
            let (status, body) =
                reject_body(&state, Some(peer.ip()), error, declared_length(&headers), now);
            return (status, Json(body));
        }
    };
    let worker = tokio::task::spawn_blocking(move || {
        plan_trip(&state, Some(peer.ip()), bytes.as_ref(), now)
    });
    let (status, body) = worker.await.unwrap_or_else(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "plan worker failed" }))
    });
    (status, Json(body))
}

/// Returns the `Content-Length` header value, or zero when absent or invalid.
fn declared_length(headers: &HeaderMap) -> usize {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Liveness probe.
async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Warns when the server listens beyond loopback.
fn emit_public_bind_warning(bind: SocketAddr) {
    if !bind.ip().is_loopback() {
        let _ = writeln!(
            std::io::stderr(),
            "trip-planner-server: WARNING: listening on non-loopback address {bind}; the API has \
             no authentication"
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
