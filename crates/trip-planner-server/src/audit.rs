// crates/trip-planner-server/src/audit.rs
// ============================================================================
// Module: Plan Audit Logging
// Description: Structured audit events for trip plan requests.
// Purpose: Emit one JSON line per request without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every plan request produces a [`PlanAuditEvent`] that is handed to a
//! [`PlanAuditSink`]. Events carry request metadata and trip totals only;
//! locations are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Serialize;
use trip_planner_config::AuditConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Plan request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Plan produced.
    Ok,
    /// Request rejected before routing.
    Rejected,
    /// Route provider failed.
    RouteFailed,
    /// Simulation or serialization failed.
    Error,
}

/// Plan request audit event payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: i128,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Request outcome.
    pub outcome: PlanOutcome,
    /// HTTP status returned.
    pub status: u16,
    /// Error message when the request failed.
    pub error: Option<String>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Route distance in miles when planned.
    pub distance_miles: Option<f64>,
    /// Elapsed trip hours when planned.
    pub total_hours: Option<f64>,
    /// Number of planned stops.
    pub stops: Option<usize>,
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for plan request events.
pub trait PlanAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &PlanAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl PlanAuditSink for StderrAuditSink {
    fn record(&self, event: &PlanAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl PlanAuditSink for FileAuditSink {
    fn record(&self, event: &PlanAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl PlanAuditSink for NoopAuditSink {
    fn record(&self, _event: &PlanAuditEvent) {}
}

/// Builds the sink selected by the audit configuration.
///
/// # Errors
///
/// Returns an error when the configured audit file cannot be opened.
pub fn audit_sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn PlanAuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => Ok(Arc::new(FileAuditSink::new(Path::new(path.trim()))?)),
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions.")]

    use trip_planner_config::AuditConfig;

    use super::FileAuditSink;
    use super::PlanAuditEvent;
    use super::PlanAuditSink;
    use super::PlanOutcome;
    use super::audit_sink_from_config;

    fn sample_event() -> PlanAuditEvent {
        PlanAuditEvent {
            event: "plan_trip",
            timestamp_ms: 1_700_000_000_000,
            peer_ip: Some("127.0.0.1".to_string()),
            outcome: PlanOutcome::RouteFailed,
            status: 400,
            error: Some("failed to get route".to_string()),
            request_bytes: 42,
            distance_miles: None,
            total_hours: None,
            stops: None,
        }
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileAuditSink::new(&path).unwrap();
        sink.record(&sample_event());
        sink.record(&sample_event());

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["outcome"], "route_failed");
        assert_eq!(value["status"], 400);
    }

    #[test]
    fn config_selects_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let config = AuditConfig {
            enabled: true,
            path: Some(path.to_string_lossy().into_owned()),
        };
        audit_sink_from_config(&config).unwrap().record(&sample_event());
        assert!(std::fs::read_to_string(&path).unwrap().contains("plan_trip"));
    }

    #[test]
    fn disabled_config_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let config = AuditConfig {
            enabled: false,
            path: Some(path.to_string_lossy().into_owned()),
        };
        audit_sink_from_config(&config).unwrap().record(&sample_event());
        assert!(!path.exists());
    }
}
