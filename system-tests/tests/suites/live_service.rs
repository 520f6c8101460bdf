// system-tests/tests/suites/live_service.rs
// ============================================================================
// Module: Live Service Tests
// Description: Canonical scenario table against the remote service.
// Purpose: Detect contract drift in the deployed API.
// Dependencies: system-tests helpers, reqres-client, reqres-harness
// ============================================================================

//! ## Overview
//! Configuration is loaded the same way operators run the harness: optional
//! TOML file, then environment overrides. No stub is involved.

use std::sync::Arc;

use reqres_client::ApiClient;
use reqres_client::ClientConfig;
use reqres_contract::SchemaRegistry;
use reqres_harness::ScenarioRunner;
use reqres_harness::user_scenarios;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::require;

#[tokio::test(flavor = "multi_thread")]
async fn live_table_conforms() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("live_table_conforms")?;
    let config = ClientConfig::load(None)?;
    let client = ApiClient::from_config(&config)?;
    let runner = ScenarioRunner::new(client, Arc::new(SchemaRegistry::builtin()?));

    let report = runner.run_all(&user_scenarios()).await;
    let artifacts = reporter.write_run_report(&report)?;
    let status = if report.all_passed() { "pass" } else { "fail" };
    reporter.finish(
        status,
        vec![format!("{} passed, {} failed against {}", report.passed(), report.failed(), config.base_url)],
        artifacts,
    )?;
    let failures: Vec<String> = report
        .failures()
        .map(|outcome| format!("{}: {}", outcome.scenario, outcome.message.as_deref().unwrap_or("")))
        .collect();
    require(report.all_passed(), format!("live failures: {}", failures.join("; ")))
}
