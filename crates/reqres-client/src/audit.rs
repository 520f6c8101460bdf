// crates/reqres-client/src/audit.rs
// ============================================================================
// Module: Harness Audit Logging
// Description: Structured audit events for HTTP calls, cases, and teardown.
// Purpose: Emit JSON-line logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for harness logging.
//! It is intentionally lightweight so suites can route events to stderr, a
//! file, or an in-memory buffer without redesign. Every event carries an
//! `event` discriminator and a `timestamp_ms`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use serde_json::Value;

use crate::client::HttpMethod;
use crate::config::AuditSinkConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event for a single HTTP call.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path relative to the base URL.
    pub path: String,
    /// Response status when the call completed.
    pub status: Option<u16>,
    /// Transport error message when the call did not complete.
    pub error: Option<String>,
    /// True when the transport failure was a timeout.
    pub timed_out: bool,
    /// Wall-clock duration of the call.
    pub elapsed_ms: u128,
}

/// Audit event for a finished test case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Scenario name.
    pub scenario: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Failure classification when the case failed.
    pub failure_kind: Option<&'static str>,
    /// Failure diagnostic when the case failed.
    pub message: Option<String>,
    /// Wall-clock duration of the case.
    pub duration_ms: u128,
}

/// Audit event for a teardown attempt.
#[derive(Debug, Clone, Serialize)]
pub struct TeardownAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Scenario that owned the resource, when known.
    pub scenario: Option<String>,
    /// Path of the released resource.
    pub resource: String,
    /// Delete response status when the call completed.
    pub status: Option<u16>,
    /// Whether the resource was released.
    pub released: bool,
    /// Failure diagnostic when release failed.
    pub error: Option<String>,
}

/// Inputs required to construct a request audit event.
#[derive(Debug, Clone)]
pub struct RequestAuditEventParams {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Response status when available.
    pub status: Option<u16>,
    /// Transport error when the call failed.
    pub error: Option<String>,
    /// True when the failure was a timeout.
    pub timed_out: bool,
    /// Call duration.
    pub elapsed_ms: u128,
}

impl RequestAuditEvent {
    /// Creates a new request audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RequestAuditEventParams) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_millis(),
            method: params.method,
            path: params.path,
            status: params.status,
            error: params.error,
            timed_out: params.timed_out,
            elapsed_ms: params.elapsed_ms,
        }
    }
}

impl CaseAuditEvent {
    /// Creates a new case audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        scenario: &str,
        failure: Option<(&'static str, String)>,
        duration_ms: u128,
    ) -> Self {
        let (failure_kind, message) = failure.map_or((None, None), |(kind, message)| {
            (Some(kind), Some(message))
        });
        Self {
            event: "case_outcome",
            timestamp_ms: now_millis(),
            scenario: scenario.to_string(),
            passed: failure_kind.is_none(),
            failure_kind,
            message,
            duration_ms,
        }
    }
}

impl TeardownAuditEvent {
    /// Creates a new teardown audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        scenario: Option<&str>,
        resource: &str,
        status: Option<u16>,
        error: Option<String>,
    ) -> Self {
        Self {
            event: "teardown",
            timestamp_ms: now_millis(),
            scenario: scenario.map(str::to_string),
            resource: resource.to_string(),
            status,
            released: error.is_none(),
            error,
        }
    }
}

/// Returns milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for harness events.
pub trait HarnessAuditSink: Send + Sync {
    /// Record an HTTP call.
    fn record_request(&self, event: &RequestAuditEvent);

    /// Record a finished test case.
    fn record_case(&self, _event: &CaseAuditEvent) {}

    /// Record a teardown attempt.
    fn record_teardown(&self, _event: &TeardownAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl HarnessAuditSink for StderrAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        write_line(&mut io::stderr(), event);
    }

    fn record_case(&self, event: &CaseAuditEvent) {
        write_line(&mut io::stderr(), event);
    }

    fn record_teardown(&self, event: &TeardownAuditEvent) {
        write_line(&mut io::stderr(), event);
    }
}

/// Audit sink that logs JSON lines to a file.
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

    /// Appends one event and flushes.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
            let _ = file.flush();
        }
    }
}

impl HarnessAuditSink for FileAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        self.append(event);
    }

    fn record_case(&self, event: &CaseAuditEvent) {
        self.append(event);
    }

    fn record_teardown(&self, event: &TeardownAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl HarnessAuditSink for NoopAuditSink {
    fn record_request(&self, _event: &RequestAuditEvent) {}
}

/// Audit sink that keeps events in memory, for assertions in tests.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Captured events as JSON values, in record order.
    events: Mutex<Vec<Value>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of captured events.
    #[must_use]
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().map_or_else(|_| Vec::new(), |events| events.clone())
    }

    /// Returns captured events with the given `event` discriminator.
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| event.get("event").and_then(Value::as_str) == Some(name))
            .collect()
    }

    /// Captures one event.
    fn push<T: Serialize>(&self, event: &T) {
        if let (Ok(value), Ok(mut events)) = (serde_json::to_value(event), self.events.lock()) {
            events.push(value);
        }
    }
}

impl HarnessAuditSink for MemoryAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        self.push(event);
    }

    fn record_case(&self, event: &CaseAuditEvent) {
        self.push(event);
    }

    fn record_teardown(&self, event: &TeardownAuditEvent) {
        self.push(event);
    }
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns an error when a file sink cannot be opened.
pub fn sink_from_config(config: &AuditSinkConfig) -> io::Result<Arc<dyn HarnessAuditSink>> {
    Ok(match config {
        AuditSinkConfig::Stderr => Arc::new(StderrAuditSink),
        AuditSinkConfig::File(path) => Arc::new(FileAuditSink::new(path)?),
        AuditSinkConfig::None => Arc::new(NoopAuditSink),
    })
}

/// Serializes an event as one JSON line.
fn write_line<W: Write + ?Sized, T: Serialize>(writer: &mut W, event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
    }
}
