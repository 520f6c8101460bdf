// system-tests/tests/suites/users.rs
// ============================================================================
// Module: User Resource Tests
// Description: Fetch, create, and update users against the stub service.
// Purpose: Validate the user rows of the scenario table end to end.
// Dependencies: system-tests helpers, reqres-harness
// ============================================================================

//! ## Overview
//! Runs the user rows of the canonical table through the runner and checks
//! the raw client behavior the rows rely on.

use reqres_harness::scenarios::scenario;
use serde_json::json;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::require;
use crate::helpers::harness::require_pass;
use crate::helpers::harness::start_stub_harness;

#[tokio::test(flavor = "multi_thread")]
async fn get_user_conforms_to_contract() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("get_user_conforms_to_contract")?;
    let harness = start_stub_harness().await?;
    let row = scenario("get_user_success").ok_or("missing get_user_success")?;

    let outcome = harness.runner.run(&row).await;
    require_pass(&outcome)?;

    let record = harness.client.get("/api/users/2").await?;
    require(record.text_at("/data/email").as_deref() == Some("janet.weaver@reqres.in"), "wrong user")?;

    reporter.finish("pass", vec!["known user matches get_user schema".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_users_answer_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("missing_users_answer_not_found")?;
    let harness = start_stub_harness().await?;

    for name in ["get_user_not_found_numeric", "get_user_not_found_non_numeric"] {
        let row = scenario(name).ok_or("missing not-found row")?;
        let outcome = harness.runner.run(&row).await;
        require_pass(&outcome)?;
    }

    reporter.finish(
        "pass",
        vec!["numeric and non-numeric unknown ids both answer 404".to_string()],
        Vec::new(),
    )?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_user_echoes_payload() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("create_user_echoes_payload")?;
    let harness = start_stub_harness().await?;
    let row = scenario("create_user_success").ok_or("missing create_user_success")?;

    let outcome = harness.runner.run(&row).await;
    require_pass(&outcome)?;

    let posted = harness.stub.requests_with_method("POST");
    require(posted.len() == 1, format!("expected one POST, got {}", posted.len()))?;
    require(
        posted[0].body == Some(json!({ "name": "morpheus1", "job": "leader" })),
        "create payload was not sent verbatim",
    )?;

    reporter.finish("pass", vec!["create echoes name and job".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn created_ids_are_distinct() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("created_ids_are_distinct")?;
    let harness = start_stub_harness().await?;
    let payload = json!({ "name": "morpheus1", "job": "leader" });

    let first = harness.client.post("/api/users", &payload).await?;
    let second = harness.client.post("/api/users", &payload).await?;
    let first_id = first.text_at("/id").ok_or("first create has no id")?;
    let second_id = second.text_at("/id").ok_or("second create has no id")?;
    require(first_id != second_id, format!("ids repeat: {first_id}"))?;

    reporter.finish("pass", vec!["two creates yield two ids".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_user_runs_inside_scoped_setup() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("update_user_runs_inside_scoped_setup")?;
    let harness = start_stub_harness().await?;
    let row = scenario("update_user_success").ok_or("missing update_user_success")?;

    let outcome = harness.runner.run(&row).await;
    require_pass(&outcome)?;

    let methods: Vec<&str> = harness
        .stub
        .requests()
        .iter()
        .filter(|request| request.path != "/api/users/1")
        .map(|request| request.method)
        .collect();
    require(methods == ["POST", "PUT", "DELETE"], format!("unexpected call order: {}", methods.join(",")))?;

    let put = harness.stub.requests_with_method("PUT");
    let delete = harness.stub.requests_with_method("DELETE");
    require(put[0].path == delete[0].path, "teardown deleted a different user")?;
    require(harness.audit.events_named("teardown").len() == 1, "teardown not logged")?;

    reporter.finish("pass", vec!["setup, update, teardown in order".to_string()], Vec::new())?;
    Ok(())
}
