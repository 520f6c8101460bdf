// system-tests/tests/suites/register.rs
// ============================================================================
// Module: Registration Tests
// Description: Registration success and exact error bodies.
// Purpose: Validate the register rows of the scenario table end to end.
// Dependencies: system-tests helpers, reqres-harness
// ============================================================================

//! ## Overview
//! Registration errors are checked against exact documents, so a reworded
//! message must fail the case as a body mismatch.

use reqres_harness::CaseFailure;
use reqres_harness::scenarios::scenario;
use serde_json::json;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::require;
use crate::helpers::harness::require_pass;
use crate::helpers::harness::start_stub_harness;
use crate::helpers::reqres_stub::Fault;
use crate::helpers::reqres_stub::REGISTER_TOKEN;
use crate::helpers::reqres_stub::Route;

#[tokio::test(flavor = "multi_thread")]
async fn register_rows_pass() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("register_rows_pass")?;
    let harness = start_stub_harness().await?;

    for name in
        ["register_user_success", "register_user_missing_password", "register_user_missing_email"]
    {
        let row = scenario(name).ok_or("missing register row")?;
        require_pass(&harness.runner.run(&row).await)?;
    }

    let record = harness
        .client
        .post("/api/register", &json!({ "email": "eve.holt@reqres.in", "password": "pistol" }))
        .await?;
    require(record.text_at("/token").as_deref() == Some(REGISTER_TOKEN), "token not returned")?;

    reporter.finish("pass", vec!["registration rows pass".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reworded_error_is_a_body_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("reworded_error_is_a_body_mismatch")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::Register, Fault::Status(400, json!({ "error": "Password missing" })));
    let row = scenario("register_user_missing_password").ok_or("missing row")?;

    let outcome = harness.runner.run(&row).await;
    require(!outcome.passed, "reworded error passed")?;
    match outcome.failure {
        Some(CaseFailure::BodyMismatch(mismatch)) => {
            require(mismatch.expected == json!({ "error": "Missing password" }), "wrong expected body")?;
            require(mismatch.actual == json!({ "error": "Password missing" }), "wrong actual body")?;
        }
        _ => return Err(format!("expected body mismatch, got {}", outcome.failure_kind.unwrap_or("pass")).into()),
    }

    reporter.finish("pass", vec!["exact body comparison is strict".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn register_token_type_drift_fails_schema() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("register_token_type_drift_fails_schema")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::Register, Fault::ReplaceField("/token".to_string(), json!(42)));
    let row = scenario("register_user_success").ok_or("missing row")?;

    let outcome = harness.runner.run(&row).await;
    require(outcome.failure_kind == Some("schema"), "expected schema failure")?;
    let message = outcome.message.unwrap_or_default();
    require(message.contains("/token: expected type string"), format!("unhelpful message: {message}"))?;

    reporter.finish("pass", vec!["token type drift detected".to_string()], Vec::new())?;
    Ok(())
}
