// crates/reqres-harness/src/outcome.rs
// ============================================================================
// Module: Test Outcomes
// Description: Failure taxonomy and per-case outcomes for the runner.
// Purpose: Classify every way a case can fail and report it without loss.
// Dependencies: reqres-client, reqres-contract, serde, thiserror
// ============================================================================

//! ## Overview
//! Every failure is surfaced as a failed [`TestOutcome`]; nothing is retried
//! or recovered. A teardown failure never replaces the failure that preceded
//! it: it is attached as a note instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqres_client::ClientError;
use reqres_client::HttpMethod;
use reqres_client::audit::CaseAuditEvent;
use reqres_contract::BodyMismatch;
use reqres_contract::SchemaError;
use reqres_contract::ValidationFailure;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Lifecycle Errors
// ============================================================================

/// Setup could not acquire the scenario resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Create call did not complete.
    #[error("create call failed: {0}")]
    Transport(ClientError),
    /// Create call returned something other than 201.
    #[error("create returned {actual}, expected 201 (body: {body})")]
    UnexpectedStatus {
        /// Status received.
        actual: u16,
        /// Body rendering for diagnostics.
        body: String,
    },
    /// Create response carried no usable identifier.
    #[error("create response has no usable id (body: {body})")]
    MissingId {
        /// Body rendering for diagnostics.
        body: String,
    },
}

/// Teardown could not release the scenario resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TeardownError {
    /// Delete call did not complete.
    #[error("delete {resource} failed: {source}")]
    Transport {
        /// Resource path.
        resource: String,
        /// Underlying transport failure.
        source: ClientError,
    },
    /// Delete call returned an unexpected status.
    #[error("delete {resource} returned {status} (body: {body})")]
    UnexpectedStatus {
        /// Resource path.
        resource: String,
        /// Status received.
        status: u16,
        /// Body rendering for diagnostics.
        body: String,
    },
    /// Teardown could not be attempted at all.
    #[error("teardown of {resource} not attempted: {message}")]
    NotAttempted {
        /// Resource path.
        resource: String,
        /// Why the attempt could not be made.
        message: String,
    },
}

// ============================================================================
// SECTION: Case Failures
// ============================================================================

/// Reason a test case failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaseFailure {
    /// Request specification could not be turned into a call.
    #[error("request could not be built: {0}")]
    Request(String),
    /// Call did not complete.
    #[error("transport failure: {0}")]
    Transport(ClientError),
    /// Response status differs from the expected status.
    #[error("{method} {path}: expected status {expected}, got {actual} (body: {body})")]
    UnexpectedStatus {
        /// Method of the call.
        method: HttpMethod,
        /// Resolved request path.
        path: String,
        /// Expected status.
        expected: u16,
        /// Actual status.
        actual: u16,
        /// Body rendering for diagnostics.
        body: String,
    },
    /// Body does not conform to its declared schema.
    #[error(transparent)]
    Schema(ValidationFailure),
    /// Body differs from the exact expected document.
    #[error(transparent)]
    BodyMismatch(BodyMismatch),
    /// A field assertion did not hold.
    #[error("field {pointer}: expected {expected}, got {actual}")]
    FieldMismatch {
        /// JSON pointer of the field.
        pointer: String,
        /// Expected value or rule.
        expected: String,
        /// Actual value rendering.
        actual: String,
    },
    /// Declared schema is not available in the registry.
    #[error("schema registry: {0}")]
    Registry(SchemaError),
    /// Setup failed before the scenario body ran.
    #[error("setup failed: {0}")]
    Setup(SetupError),
    /// Scenario passed but its resource could not be released.
    #[error("teardown failed: {0}")]
    Teardown(TeardownError),
}

impl CaseFailure {
    /// Returns a stable classification label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Transport(_) => "transport",
            Self::UnexpectedStatus {
                ..
            } => "unexpected_status",
            Self::Schema(_) => "schema",
            Self::BodyMismatch(_) => "body_mismatch",
            Self::FieldMismatch {
                ..
            } => "field_mismatch",
            Self::Registry(_) => "registry",
            Self::Setup(_) => "setup",
            Self::Teardown(_) => "teardown",
        }
    }
}

impl From<ClientError> for CaseFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport {
                ..
            } => Self::Transport(err),
            ClientError::InvalidPath {
                ..
            }
            | ClientError::Build(_) => Self::Request(err.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of running one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    /// Scenario name.
    pub scenario: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Failure classification when the case failed.
    pub failure_kind: Option<&'static str>,
    /// Failure diagnostic when the case failed.
    pub message: Option<String>,
    /// Secondary observations (for example a teardown failure after a failed body).
    pub notes: Vec<String>,
    /// Wall-clock duration of the case.
    pub duration_ms: u128,
    /// Typed failure for programmatic inspection.
    #[serde(skip)]
    pub failure: Option<CaseFailure>,
}

impl TestOutcome {
    /// Builds an outcome from a case result.
    #[must_use]
    pub fn new(
        scenario: &str,
        result: Result<(), CaseFailure>,
        notes: Vec<String>,
        duration: Duration,
    ) -> Self {
        let failure = result.err();
        Self {
            scenario: scenario.to_string(),
            passed: failure.is_none(),
            failure_kind: failure.as_ref().map(CaseFailure::kind),
            message: failure.as_ref().map(ToString::to_string),
            notes,
            duration_ms: duration.as_millis(),
            failure,
        }
    }

    /// Builds the audit event for this outcome.
    #[must_use]
    pub fn audit_event(&self) -> CaseAuditEvent {
        let failure = self.failure_kind.zip(self.message.clone());
        CaseAuditEvent::new(&self.scenario, failure, self.duration_ms)
    }

    /// Converts the outcome into a `Result`, for use with `?` in tests.
    ///
    /// # Errors
    ///
    /// Returns the case failure when the case failed.
    pub fn into_result(self) -> Result<(), CaseFailure> {
        self.failure.map_or(Ok(()), Err)
    }
}

/// Outcomes of a scenario table run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Outcomes in table order.
    pub outcomes: Vec<TestOutcome>,
}

impl RunReport {
    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed).count()
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Returns true when every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    /// Returns the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed)
    }

    /// Looks up an outcome by scenario name.
    #[must_use]
    pub fn outcome(&self, scenario: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|outcome| outcome.scenario == scenario)
    }
}
