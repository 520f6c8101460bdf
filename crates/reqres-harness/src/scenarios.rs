// crates/reqres-harness/src/scenarios.rs
// ============================================================================
// Module: Scenario Table
// Description: Parametrized contract scenarios for the user and register API.
// Purpose: Express every case as data consumed by one generic runner.
// Dependencies: reqres-client, reqres-contract, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Scenario`] is one row of the contract table: optional setup, the
//! request, the expected status, an optional body expectation, field checks,
//! and an optional follow-up call. [`user_scenarios`] is the canonical table.
//!
//! Both "not found" rows are kept on purpose: one uses a numeric id that does
//! not exist and one uses a non-numeric id. The service answers 404 to both.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqres_client::ResponseRecord;
use reqres_contract::OperationName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::outcome::CaseFailure;
use crate::request::REGISTER_PATH;
use crate::request::RequestSpec;
use crate::request::USER_PATH_TEMPLATE;
use crate::request::USERS_PATH;
use crate::request::user_path;

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// What the response body must look like once the status matched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BodyExpectation {
    /// Body is not inspected.
    #[default]
    Unchecked,
    /// Body must conform to the named operation schema.
    Schema(OperationName),
    /// Body must equal this document exactly.
    Exact(Value),
}

/// Rule applied to one field of the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum FieldRule {
    /// Field equals this value.
    Equals(Value),
    /// Field is present and not null, empty string, empty array, or empty object.
    NonEmpty,
    /// Field equals the request payload's value at the same pointer.
    EchoesRequest,
}

/// Assertion on one field of the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCheck {
    /// JSON pointer into the body.
    pub pointer: String,
    /// Rule the field must satisfy.
    pub rule: FieldRule,
}

impl FieldCheck {
    /// Checks that a field echoes the request payload.
    #[must_use]
    pub fn echoes(pointer: &str) -> Self {
        Self {
            pointer: pointer.to_string(),
            rule: FieldRule::EchoesRequest,
        }
    }

    /// Checks that a field is non-empty.
    #[must_use]
    pub fn non_empty(pointer: &str) -> Self {
        Self {
            pointer: pointer.to_string(),
            rule: FieldRule::NonEmpty,
        }
    }

    /// Checks that a field equals a value.
    #[must_use]
    pub fn equals(pointer: &str, value: Value) -> Self {
        Self {
            pointer: pointer.to_string(),
            rule: FieldRule::Equals(value),
        }
    }

    /// Evaluates the check against a response and the request payload.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure::FieldMismatch`] when the rule does not hold and
    /// [`CaseFailure::Request`] when an echo check has nothing to echo.
    pub fn evaluate(
        &self,
        record: &ResponseRecord,
        payload: Option<&Value>,
    ) -> Result<(), CaseFailure> {
        let actual = record.pointer(&self.pointer);
        let expected = match &self.rule {
            FieldRule::Equals(value) => value.clone(),
            FieldRule::EchoesRequest => payload
                .and_then(|payload| payload.pointer(&self.pointer))
                .cloned()
                .ok_or_else(|| {
                    CaseFailure::Request(format!(
                        "echo check on {} has no matching request payload field",
                        self.pointer
                    ))
                })?,
            FieldRule::NonEmpty => {
                return if actual.is_some_and(is_non_empty) {
                    Ok(())
                } else {
                    Err(self.mismatch("a non-empty value".to_string(), actual, record))
                };
            }
        };
        if actual == Some(&expected) {
            Ok(())
        } else {
            Err(self.mismatch(expected.to_string(), actual, record))
        }
    }

    /// Builds a field mismatch failure.
    fn mismatch(&self, expected: String, actual: Option<&Value>, record: &ResponseRecord) -> CaseFailure {
        let actual = match (actual, record.json()) {
            (Some(value), _) => value.to_string(),
            (None, Some(_)) => "<absent>".to_string(),
            (None, None) => format!("<non-json body: {}>", record.body.describe()),
        };
        CaseFailure::FieldMismatch {
            pointer: self.pointer.clone(),
            expected,
            actual,
        }
    }
}

/// Returns true for values that carry content.
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// Resource acquired before the scenario body and released after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    /// Payload for `POST /api/users`.
    pub create_payload: Value,
}

/// Extra call made after the main checks pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    /// Request to issue; may reference `{id}`.
    pub request: RequestSpec,
    /// Expected status.
    pub expected_status: u16,
}

/// One row of the contract table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique scenario name.
    pub name: String,
    /// Optional scoped resource.
    #[serde(default)]
    pub setup: Option<Setup>,
    /// Main request.
    pub request: RequestSpec,
    /// Expected status of the main request.
    pub expected_status: u16,
    /// Body expectation checked after the status.
    #[serde(default)]
    pub body: BodyExpectation,
    /// Field checks evaluated after the body expectation.
    #[serde(default)]
    pub fields: Vec<FieldCheck>,
    /// Optional follow-up call.
    #[serde(default)]
    pub follow_up: Option<FollowUp>,
}

impl Scenario {
    /// Starts a scenario with a request and expected status.
    #[must_use]
    pub fn new(name: &str, request: RequestSpec, expected_status: u16) -> Self {
        Self {
            name: name.to_string(),
            setup: None,
            request,
            expected_status,
            body: BodyExpectation::Unchecked,
            fields: Vec::new(),
            follow_up: None,
        }
    }

    /// Creates a user before the scenario and deletes it afterwards.
    #[must_use]
    pub fn with_setup(mut self, create_payload: Value) -> Self {
        self.setup = Some(Setup {
            create_payload,
        });
        self
    }

    /// Requires the body to conform to an operation schema.
    #[must_use]
    pub fn expect_schema(mut self, operation: OperationName) -> Self {
        self.body = BodyExpectation::Schema(operation);
        self
    }

    /// Requires the body to equal a document exactly.
    #[must_use]
    pub fn expect_body(mut self, body: Value) -> Self {
        self.body = BodyExpectation::Exact(body);
        self
    }

    /// Adds a field check.
    #[must_use]
    pub fn check(mut self, check: FieldCheck) -> Self {
        self.fields.push(check);
        self
    }

    /// Adds a follow-up call.
    #[must_use]
    pub fn then(mut self, request: RequestSpec, expected_status: u16) -> Self {
        self.follow_up = Some(FollowUp {
            request,
            expected_status,
        });
        self
    }
}

// ============================================================================
// SECTION: Canonical Table
// ============================================================================

/// Known user identifier on the service.
pub const KNOWN_USER_ID: &str = "2";
/// Numeric identifier with no user behind it.
pub const MISSING_NUMERIC_USER_ID: &str = "999999";
/// Identifier that is not numeric at all.
pub const NON_NUMERIC_USER_ID: &str = "not-a-user";
/// Email of the account the service allows to register.
pub const REGISTER_EMAIL: &str = "eve.holt@reqres.in";
/// Password used for registration.
pub const REGISTER_PASSWORD: &str = "pistol";

/// Returns the canonical user and registration scenario table.
#[must_use]
pub fn user_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("get_user_success", RequestSpec::get(user_path(KNOWN_USER_ID)), 200)
            .expect_schema(OperationName::GetUser),
        Scenario::new(
            "get_user_not_found_numeric",
            RequestSpec::get(user_path(MISSING_NUMERIC_USER_ID)),
            404,
        ),
        Scenario::new(
            "get_user_not_found_non_numeric",
            RequestSpec::get(user_path(NON_NUMERIC_USER_ID)),
            404,
        ),
        Scenario::new(
            "create_user_success",
            RequestSpec::post(USERS_PATH, json!({ "name": "morpheus1", "job": "leader" })),
            201,
        )
        .expect_schema(OperationName::CreateUser)
        .check(FieldCheck::echoes("/name"))
        .check(FieldCheck::echoes("/job"))
        .check(FieldCheck::non_empty("/id"))
        .check(FieldCheck::non_empty("/createdAt")),
        Scenario::new(
            "register_user_success",
            RequestSpec::post(
                REGISTER_PATH,
                json!({ "email": REGISTER_EMAIL, "password": REGISTER_PASSWORD }),
            ),
            200,
        )
        .expect_schema(OperationName::RegisterUser),
        Scenario::new(
            "register_user_missing_password",
            RequestSpec::post(REGISTER_PATH, json!({ "email": REGISTER_EMAIL })),
            400,
        )
        .expect_body(json!({ "error": "Missing password" })),
        Scenario::new(
            "register_user_missing_email",
            RequestSpec::post(REGISTER_PATH, json!({ "password": REGISTER_PASSWORD })),
            400,
        )
        .expect_body(json!({ "error": "Missing email or username" })),
        Scenario::new(
            "update_user_success",
            RequestSpec::put(
                USER_PATH_TEMPLATE,
                json!({ "name": "updated_user", "job": "qa engineer" }),
            ),
            200,
        )
        .with_setup(json!({ "name": "test_user", "job": "tester" }))
        .expect_schema(OperationName::UpdateUser)
        .check(FieldCheck::echoes("/name"))
        .check(FieldCheck::echoes("/job")),
        Scenario::new("delete_user_success", RequestSpec::delete(USER_PATH_TEMPLATE), 204)
            .with_setup(json!({ "name": "temp_user", "job": "temp" }))
            .then(RequestSpec::get(USER_PATH_TEMPLATE), 404),
    ]
}

/// Looks up a scenario from the canonical table by name.
#[must_use]
pub fn scenario(name: &str) -> Option<Scenario> {
    user_scenarios().into_iter().find(|scenario| scenario.name == name)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
