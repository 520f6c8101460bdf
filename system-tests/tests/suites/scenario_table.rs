// system-tests/tests/suites/scenario_table.rs
// ============================================================================
// Module: Scenario Table Tests
// Description: Full table run against the stub with report artifacts.
// Purpose: Prove every row passes against a conforming service.
// Dependencies: system-tests helpers, reqres-client, reqres-harness, tempfile
// ============================================================================

//! ## Overview
//! Runs the whole canonical table, writes the run report, and checks the
//! audit trail, including the file sink selected through TOML configuration.

use std::fs;

use reqres_client::ApiClient;
use reqres_client::ClientConfig;
use reqres_contract::SchemaRegistry;
use reqres_harness::ScenarioRunner;
use reqres_harness::user_scenarios;
use serde_json::Value;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::require;
use crate::helpers::harness::start_stub_harness;

#[tokio::test(flavor = "multi_thread")]
async fn full_table_passes_against_stub() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("full_table_passes_against_stub")?;
    let harness = start_stub_harness().await?;
    let table = user_scenarios();

    let report = harness.runner.run_all(&table).await;
    let artifacts = reporter.write_run_report(&report)?;
    let failures: Vec<String> = report
        .failures()
        .map(|outcome| format!("{}: {}", outcome.scenario, outcome.message.as_deref().unwrap_or("")))
        .collect();
    require(report.all_passed(), format!("failures: {}", failures.join("; ")))?;
    require(report.outcomes.len() == table.len(), "not every row ran")?;

    let order: Vec<&str> = report.outcomes.iter().map(|outcome| outcome.scenario.as_str()).collect();
    let expected: Vec<&str> = table.iter().map(|row| row.name.as_str()).collect();
    require(order == expected, "rows ran out of order")?;

    require(harness.audit.events_named("case_outcome").len() == table.len(), "case events missing")?;
    require(harness.audit.events_named("teardown").len() == 1, "expected one teardown (update row)")?;

    reporter.finish("pass", vec![format!("{} rows passed", report.passed())], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn file_sink_from_toml_records_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("file_sink_from_toml_records_json_lines")?;
    let harness = start_stub_harness().await?;
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("audit.jsonl");
    let toml = format!(
        "base_url = \"{}\"\ntimeout_sec = 5\n\n[audit]\nsink = \"file\"\npath = \"{}\"\n",
        harness.stub.base_url(),
        log_path.display()
    );
    let config = ClientConfig::from_toml_str(&toml)?;
    let client = ApiClient::from_config(&config)?;
    let runner = ScenarioRunner::new(client, std::sync::Arc::new(SchemaRegistry::builtin()?));

    let rows: Vec<_> =
        user_scenarios().into_iter().filter(|row| row.name.starts_with("get_user")).collect();
    let report = runner.run_all(&rows).await;
    require(report.all_passed(), "get_user rows failed")?;

    let lines = fs::read_to_string(&log_path)?;
    let events: Vec<Value> =
        lines.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    let kinds: Vec<&str> = events.iter().filter_map(|event| event["event"].as_str()).collect();
    require(kinds.iter().filter(|kind| **kind == "http_request").count() == rows.len(), "request lines")?;
    require(kinds.iter().filter(|kind| **kind == "case_outcome").count() == rows.len(), "case lines")?;

    reporter.finish("pass", vec!["file sink wrote one line per event".to_string()], Vec::new())?;
    Ok(())
}
