// crates/reqres-harness/src/lifecycle.rs
// ============================================================================
// Module: Scoped Resources
// Description: Users created for a scenario and deleted when it ends.
// Purpose: Guarantee teardown on every exit path, including unwinding.
// Dependencies: reqres-client, serde_json, tokio
// ============================================================================

//! ## Overview
//! [`ScopedUser::create`] acquires a user through `POST /api/users`. The
//! runner releases it explicitly with [`ScopedUser::release`] so teardown
//! failures can be reported. A guard dropped while still holding its user
//! (a panic or a cancelled future) releases it from a dedicated thread with
//! its own runtime and connection pool, and logs the attempt.
//!
//! A `2xx` or `404` answer to the teardown `DELETE` counts as released.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;

use reqres_client::ApiClient;
use reqres_client::ResponseRecord;
use reqres_client::audit::TeardownAuditEvent;
use serde_json::Value;

use crate::outcome::SetupError;
use crate::outcome::TeardownError;
use crate::request::USERS_PATH;
use crate::request::user_path;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Status the service returns for a created user.
pub const CREATED_STATUS: u16 = 201;
/// Maximum length of a resource identifier accepted from the service.
const MAX_ID_LENGTH: usize = 64;

// ============================================================================
// SECTION: Scoped User
// ============================================================================

/// Release state of a scoped user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReleaseState {
    /// User exists and must be deleted.
    Held,
    /// Teardown has been attempted.
    Released,
    /// Scenario deleted the user itself.
    Consumed,
}

/// User that exists for the duration of one scenario.
#[derive(Debug)]
pub struct ScopedUser {
    /// Client used for the teardown call.
    client: ApiClient,
    /// Owning scenario, for audit events.
    scenario: Option<String>,
    /// Identifier assigned by the service.
    id: String,
    /// Item path of the user.
    path: String,
    /// Current release state.
    state: ReleaseState,
}

impl ScopedUser {
    /// Creates a user and returns a guard that owns it.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the create call does not complete, does not
    /// answer `201`, or carries no usable identifier.
    pub async fn create(
        client: &ApiClient,
        scenario: Option<&str>,
        payload: &Value,
    ) -> Result<Self, SetupError> {
        let record = client.post(USERS_PATH, payload).await.map_err(SetupError::Transport)?;
        if record.status != CREATED_STATUS {
            return Err(SetupError::UnexpectedStatus {
                actual: record.status,
                body: record.body.describe(),
            });
        }
        let id = record.text_at("/id").filter(|id| is_usable_id(id)).ok_or_else(|| {
            SetupError::MissingId {
                body: record.body.describe(),
            }
        })?;
        Ok(Self {
            client: client.clone(),
            scenario: scenario.map(str::to_string),
            path: user_path(&id),
            id,
            state: ReleaseState::Held,
        })
    }

    /// Returns the identifier assigned by the service.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the item path of the user.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true while the user still needs to be deleted.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.state == ReleaseState::Held
    }

    /// Records that the scenario deleted the user itself.
    pub fn mark_consumed(&mut self) {
        if self.state == ReleaseState::Held {
            self.state = ReleaseState::Consumed;
        }
    }

    /// Deletes the user.
    ///
    /// Does nothing when the user was already released or consumed.
    ///
    /// # Errors
    ///
    /// Returns [`TeardownError`] when the delete call does not complete or
    /// answers with a status other than `2xx` or `404`.
    pub async fn release(mut self) -> Result<(), TeardownError> {
        if self.state != ReleaseState::Held {
            return Ok(());
        }
        self.state = ReleaseState::Released;
        let result = self.client.delete(&self.path).await;
        settle(&self.client, self.scenario.as_deref(), &self.path, result)
    }
}

impl Drop for ScopedUser {
    fn drop(&mut self) {
        if self.state != ReleaseState::Held {
            return;
        }
        self.state = ReleaseState::Released;
        let client = self.client.clone();
        let scenario = self.scenario.clone();
        let path = self.path.clone();
        let handle = thread::Builder::new()
            .name("reqres-teardown".to_string())
            .spawn(move || release_blocking(&client, scenario.as_deref(), &path));
        match handle {
            Ok(handle) => {
                let _ = handle.join();
            }
            Err(err) => {
                let error = TeardownError::NotAttempted {
                    resource: self.path.clone(),
                    message: format!("teardown thread: {err}"),
                };
                self.client.audit().record_teardown(&TeardownAuditEvent::new(
                    self.scenario.as_deref(),
                    &self.path,
                    None,
                    Some(error.to_string()),
                ));
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Releases a user from outside any async context.
fn release_blocking(client: &ApiClient, scenario: Option<&str>, path: &str) {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build();
    let outcome = match (runtime, client.detached()) {
        (Ok(runtime), Ok(detached)) => {
            let result = runtime.block_on(detached.delete(path));
            settle(&detached, scenario, path, result)
        }
        (Err(err), _) => Err(not_attempted(path, format!("runtime: {err}"))),
        (_, Err(err)) => Err(not_attempted(path, err.to_string())),
    };
    if let Err(err @ TeardownError::NotAttempted { .. }) = outcome {
        client.audit().record_teardown(&TeardownAuditEvent::new(
            scenario,
            path,
            None,
            Some(err.to_string()),
        ));
    }
}

/// Builds a not-attempted teardown error.
fn not_attempted(path: &str, message: String) -> TeardownError {
    TeardownError::NotAttempted {
        resource: path.to_string(),
        message,
    }
}

/// Classifies a teardown response and records the audit event.
fn settle(
    client: &ApiClient,
    scenario: Option<&str>,
    path: &str,
    result: Result<ResponseRecord, reqres_client::ClientError>,
) -> Result<(), TeardownError> {
    let (status, outcome) = match result {
        Ok(record) if is_released(record.status) => (Some(record.status), Ok(())),
        Ok(record) => (
            Some(record.status),
            Err(TeardownError::UnexpectedStatus {
                resource: path.to_string(),
                status: record.status,
                body: record.body.describe(),
            }),
        ),
        Err(source) => (
            None,
            Err(TeardownError::Transport {
                resource: path.to_string(),
                source,
            }),
        ),
    };
    let error = outcome.as_ref().err().map(ToString::to_string);
    client.audit().record_teardown(&TeardownAuditEvent::new(scenario, path, status, error));
    outcome
}

/// Returns true when a delete status means the user no longer exists.
const fn is_released(status: u16) -> bool {
    matches!(status, 200..=299 | 404)
}

/// Returns true when an identifier is safe to splice into a path.
fn is_usable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LENGTH
        && id.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        && id != "."
        && id != ".."
}

// ============================================================================
// SECTION: Tests
// ============================================================================
