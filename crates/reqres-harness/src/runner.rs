// crates/reqres-harness/src/runner.rs
// ============================================================================
// Module: Test Case Runner
// Description: Executes scenarios against the service and records outcomes.
// Purpose: Apply status, body, and field checks in a fixed order.
// Dependencies: reqres-client, reqres-contract, serde_json
// ============================================================================

//! ## Overview
//! For each [`Scenario`] the runner:
//! 1. Acquires the setup resource, if any.
//! 2. Issues the request and checks the status first.
//! 3. Checks the body (schema or exact document).
//! 4. Evaluates field checks, then the follow-up call.
//! 5. Releases the setup resource, whatever happened before.
//!
//! The first failing check ends the case. A teardown failure fails an
//! otherwise passing case, and is attached as a note to a case that already
//! failed. Cases run one at a time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use reqres_client::ApiClient;
use reqres_client::HarnessAuditSink;
use reqres_client::HttpMethod;
use reqres_client::ResponseBody;
use reqres_client::ResponseRecord;
use reqres_contract::SchemaRegistry;
use reqres_contract::ValidationFailure;
use reqres_contract::expect_exact;
use reqres_contract::validate;
use serde_json::Value;

use crate::lifecycle::ScopedUser;
use crate::outcome::CaseFailure;
use crate::outcome::RunReport;
use crate::outcome::TeardownError;
use crate::outcome::TestOutcome;
use crate::request::RequestSpec;
use crate::scenarios::BodyExpectation;
use crate::scenarios::Scenario;

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs scenarios with a shared client and schema registry.
#[derive(Clone)]
pub struct ScenarioRunner {
    /// Client for every call the runner makes.
    client: ApiClient,
    /// Registry used for schema expectations.
    registry: Arc<SchemaRegistry>,
    /// Sink for case outcome events.
    audit: Arc<dyn HarnessAuditSink>,
}

impl ScenarioRunner {
    /// Creates a runner that logs to the client's audit sink.
    #[must_use]
    pub fn new(client: ApiClient, registry: Arc<SchemaRegistry>) -> Self {
        let audit = client.audit();
        Self {
            client,
            registry,
            audit,
        }
    }

    /// Routes request, teardown, and case events to one sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn HarnessAuditSink>) -> Self {
        self.client = self.client.with_audit(Arc::clone(&audit));
        self.audit = audit;
        self
    }

    /// Returns the client the runner uses.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Runs one scenario and returns its outcome.
    pub async fn run(&self, scenario: &Scenario) -> TestOutcome {
        let started = Instant::now();
        let mut notes = Vec::new();
        let result = match &scenario.setup {
            None => self.execute(scenario, None).await,
            Some(setup) => {
                match ScopedUser::create(&self.client, Some(&scenario.name), &setup.create_payload)
                    .await
                {
                    Err(err) => Err(CaseFailure::Setup(err)),
                    Ok(mut user) => {
                        let body = self.execute(scenario, Some(&mut user)).await;
                        let teardown = user.release().await;
                        combine(body, teardown, &mut notes)
                    }
                }
            }
        };
        let outcome = TestOutcome::new(&scenario.name, result, notes, started.elapsed());
        self.audit.record_case(&outcome.audit_event());
        outcome
    }

    /// Runs scenarios one after another, in order.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunReport {
        let mut report = RunReport::default();
        for scenario in scenarios {
            report.outcomes.push(self.run(scenario).await);
        }
        report
    }

    /// Runs the scenario body against an optional setup resource.
    async fn execute(
        &self,
        scenario: &Scenario,
        mut resource: Option<&mut ScopedUser>,
    ) -> Result<(), CaseFailure> {
        let resource_id = resource.as_ref().map(|user| user.id().to_string());
        let (path, record) =
            self.call(&scenario.request, resource_id.as_deref(), scenario.expected_status).await?;

        if let Some(user) = resource.as_mut()
            && scenario.request.method == HttpMethod::Delete
            && path == user.path()
            && (200..300).contains(&record.status)
        {
            user.mark_consumed();
        }

        check_body(&self.registry, &scenario.body, &record)?;
        for check in &scenario.fields {
            check.evaluate(&record, scenario.request.payload.as_ref())?;
        }
        if let Some(follow_up) = &scenario.follow_up {
            self.call(&follow_up.request, resource_id.as_deref(), follow_up.expected_status).await?;
        }
        Ok(())
    }

    /// Issues one request and checks its status.
    async fn call(
        &self,
        request: &RequestSpec,
        resource_id: Option<&str>,
        expected_status: u16,
    ) -> Result<(String, ResponseRecord), CaseFailure> {
        let path = request.bind(resource_id)?;
        let record = self.client.send(request.method, &path, request.payload.as_ref()).await?;
        check_status(request.method, &path, expected_status, &record)?;
        Ok((path, record))
    }
}

impl std::fmt::Debug for ScenarioRunner {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ScenarioRunner")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Fails when the response status differs from the expected status.
///
/// # Errors
///
/// Returns [`CaseFailure::UnexpectedStatus`] with the body for diagnostics.
pub fn check_status(
    method: HttpMethod,
    path: &str,
    expected: u16,
    record: &ResponseRecord,
) -> Result<(), CaseFailure> {
    if record.status == expected {
        return Ok(());
    }
    Err(CaseFailure::UnexpectedStatus {
        method,
        path: path.to_string(),
        expected,
        actual: record.status,
        body: record.body.describe(),
    })
}

/// Applies a body expectation to a response.
///
/// # Errors
///
/// Returns [`CaseFailure::Schema`], [`CaseFailure::BodyMismatch`], or
/// [`CaseFailure::Registry`] when the expectation does not hold.
pub fn check_body(
    registry: &SchemaRegistry,
    expectation: &BodyExpectation,
    record: &ResponseRecord,
) -> Result<(), CaseFailure> {
    match expectation {
        BodyExpectation::Unchecked => Ok(()),
        BodyExpectation::Schema(operation) => {
            let schema = registry.get(*operation).map_err(CaseFailure::Registry)?;
            match &record.body {
                ResponseBody::Json(body) => validate(body, schema).map_err(CaseFailure::Schema),
                ResponseBody::Text(text) => Err(CaseFailure::Schema(ValidationFailure::not_json(
                    operation.as_str(),
                    Some(text),
                ))),
                ResponseBody::Empty => {
                    Err(CaseFailure::Schema(ValidationFailure::not_json(operation.as_str(), None)))
                }
            }
        }
        BodyExpectation::Exact(expected) => {
            let actual = match &record.body {
                ResponseBody::Json(body) => body.clone(),
                ResponseBody::Text(text) => Value::String(text.clone()),
                ResponseBody::Empty => Value::Null,
            };
            expect_exact(&actual, expected).map_err(CaseFailure::BodyMismatch)
        }
    }
}

/// Merges the scenario result with the teardown result.
///
/// The body failure always wins; a teardown failure after it becomes a note.
pub fn combine(
    body: Result<(), CaseFailure>,
    teardown: Result<(), TeardownError>,
    notes: &mut Vec<String>,
) -> Result<(), CaseFailure> {
    match (body, teardown) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(teardown)) => Err(CaseFailure::Teardown(teardown)),
        (Err(failure), Ok(())) => Err(failure),
        (Err(failure), Err(teardown)) => {
            notes.push(format!("teardown also failed: {teardown}"));
            Err(failure)
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
