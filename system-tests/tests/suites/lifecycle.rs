// system-tests/tests/suites/lifecycle.rs
// ============================================================================
// Module: Scoped Resource Tests
// Description: Setup and teardown behavior on every exit path.
// Purpose: Ensure created users are deleted and teardown never masks failures.
// Dependencies: system-tests helpers, reqres-harness
// ============================================================================

//! ## Overview
//! Covers explicit release, release after a failed body, teardown failure
//! precedence, setup failure, self-deleting scenarios, and the drop fallback
//! used when a scenario unwinds or is cancelled.

use reqres_harness::CaseFailure;
use reqres_harness::ScopedUser;
use reqres_harness::SetupError;
use reqres_harness::scenarios::scenario;
use serde_json::json;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::require;
use crate::helpers::harness::require_pass;
use crate::helpers::harness::start_stub_harness;
use crate::helpers::reqres_stub::Fault;
use crate::helpers::reqres_stub::Route;

#[tokio::test(flavor = "multi_thread")]
async fn teardown_runs_after_body_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("teardown_runs_after_body_failure")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::UpdateUser, Fault::RemoveField("/updatedAt".to_string()));
    let row = scenario("update_user_success").ok_or("missing row")?;

    let outcome = harness.runner.run(&row).await;
    require(outcome.failure_kind == Some("schema"), "expected schema failure")?;
    require(outcome.notes.is_empty(), "clean teardown produced notes")?;
    let deletes = harness.stub.requests_with_method("DELETE");
    require(deletes.len() == 1, format!("expected one teardown DELETE, got {}", deletes.len()))?;

    reporter.finish("pass", vec!["user deleted after failed body".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn teardown_failure_does_not_mask_body_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("teardown_failure_does_not_mask_body_failure")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::UpdateUser, Fault::ReplaceField("/name".to_string(), json!("other")));
    harness.stub.inject(Route::DeleteUser, Fault::Status(500, json!({ "error": "stuck" })));
    let row = scenario("update_user_success").ok_or("missing row")?;

    let outcome = harness.runner.run(&row).await;
    require(outcome.failure_kind == Some("field_mismatch"), "original failure was replaced")?;
    require(outcome.notes.len() == 1, "teardown failure not attached as a note")?;
    require(outcome.notes[0].contains("500"), "note lacks teardown status")?;

    let teardowns = harness.audit.events_named("teardown");
    require(teardowns.len() == 1, "teardown attempt not logged")?;
    require(teardowns[0]["released"] == json!(false), "failed teardown logged as released")?;

    reporter.finish("pass", vec!["body failure kept, teardown noted".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn teardown_failure_fails_a_passing_case() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("teardown_failure_fails_a_passing_case")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::DeleteUser, Fault::Status(500, json!({ "error": "stuck" })));
    let row = scenario("update_user_success").ok_or("missing row")?;

    let outcome = harness.runner.run(&row).await;
    require(
        matches!(outcome.failure, Some(CaseFailure::Teardown(_))),
        "teardown failure did not fail the case",
    )?;

    reporter.finish("pass", vec!["teardown failure surfaced".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn teardown_accepts_already_deleted_user() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("teardown_accepts_already_deleted_user")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::DeleteUser, Fault::Status(404, json!({})));
    let row = scenario("update_user_success").ok_or("missing row")?;

    require_pass(&harness.runner.run(&row).await)?;

    reporter.finish("pass", vec!["404 on teardown counts as released".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn setup_failure_skips_the_body() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("setup_failure_skips_the_body")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::CreateUser, Fault::Status(503, json!({ "error": "busy" })));
    let row = scenario("update_user_success").ok_or("missing row")?;

    let outcome = harness.runner.run(&row).await;
    require(
        matches!(
            outcome.failure,
            Some(CaseFailure::Setup(SetupError::UnexpectedStatus {
                actual: 503,
                ..
            }))
        ),
        "expected setup failure with status 503",
    )?;
    require(harness.stub.requests_with_method("PUT").is_empty(), "body ran without setup")?;
    require(harness.stub.requests_with_method("DELETE").is_empty(), "teardown ran without resource")?;

    reporter.finish("pass", vec!["setup failure stops the case".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_without_id_is_a_setup_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("create_without_id_is_a_setup_failure")?;
    let harness = start_stub_harness().await?;
    harness.stub.inject(Route::CreateUser, Fault::RemoveField("/id".to_string()));

    let result = ScopedUser::create(&harness.client, None, &json!({ "name": "x", "job": "y" })).await;
    require(matches!(result, Err(SetupError::MissingId { .. })), "expected missing id")?;

    reporter.finish("pass", vec!["create without id rejected".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_scenario_consumes_its_resource() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("deleting_scenario_consumes_its_resource")?;
    let harness = start_stub_harness().await?;
    let row = scenario("delete_user_success").ok_or("missing row")?;

    require_pass(&harness.runner.run(&row).await)?;
    let deletes = harness.stub.requests_with_method("DELETE");
    require(deletes.len() == 1, format!("expected one DELETE, got {}", deletes.len()))?;
    let follow_ups: Vec<_> = harness
        .stub
        .requests_with_method("GET")
        .into_iter()
        .filter(|request| request.path == deletes[0].path)
        .collect();
    require(follow_ups.len() == 1, "follow-up GET not issued")?;

    reporter.finish("pass", vec!["delete verified by follow-up 404".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_guard_releases_user() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("dropped_guard_releases_user")?;
    let harness = start_stub_harness().await?;

    let user =
        ScopedUser::create(&harness.client, Some("dropped"), &json!({ "name": "a", "job": "b" })).await?;
    let id = user.id().to_string();
    require(harness.stub.has_user(&id), "user not created")?;
    drop(user);

    require(!harness.stub.has_user(&id), "dropped guard did not delete the user")?;
    let teardowns = harness.audit.events_named("teardown");
    require(teardowns.len() == 1, "drop release not logged")?;
    require(teardowns[0]["scenario"] == json!("dropped"), "teardown event lacks scenario")?;

    reporter.finish("pass", vec!["drop fallback released the user".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_scenario_still_releases_user() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("panicking_scenario_still_releases_user")?;
    let harness = start_stub_harness().await?;
    let client = harness.client.clone();

    let task = tokio::spawn(async move {
        let user = ScopedUser::create(&client, Some("panics"), &json!({ "name": "a", "job": "b" }))
            .await
            .map_err(|err| err.to_string())?;
        if user.is_held() {
            std::panic::panic_any(user.id().to_string());
        }
        Ok::<(), String>(())
    });
    let joined = task.await;
    require(joined.as_ref().is_err_and(tokio::task::JoinError::is_panic), "task did not panic")?;

    let posted = harness.stub.requests_with_method("POST");
    let deletes = harness.stub.requests_with_method("DELETE");
    require(posted.len() == 1 && deletes.len() == 1, "user not released after panic")?;

    reporter.finish("pass", vec!["unwinding released the user".to_string()], Vec::new())?;
    Ok(())
}
