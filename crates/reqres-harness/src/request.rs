// crates/reqres-harness/src/request.rs
// ============================================================================
// Module: Request Specifications
// Description: Method, path template, and optional JSON payload for one call.
// Purpose: Describe a call declaratively and bind it to a setup resource.
// Dependencies: reqres-client, serde, serde_json
// ============================================================================

//! ## Overview
//! Method, path template, and optional JSON payload for one call.

use reqres_client::HttpMethod;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::outcome::CaseFailure;

/// Placeholder bound to the identifier of the scenario's setup resource.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Collection path for users.
pub const USERS_PATH: &str = "/api/users";
/// Item path template for a single user.
pub const USER_PATH_TEMPLATE: &str = "/api/users/{id}";
/// Registration path.
pub const REGISTER_PATH: &str = "/api/register";

/// Declarative description of one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template relative to the base URL.
    pub path: String,
    /// Optional JSON payload.
    #[serde(default)]
    pub payload: Option<Value>,
}

impl RequestSpec {
    /// `GET path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            payload: None,
        }
    }

    /// `POST path` with a payload.
    #[must_use]
    pub fn post(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            payload: Some(payload),
        }
    }

    /// `PUT path` with a payload.
    #[must_use]
    pub fn put(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: HttpMethod::Put,
            path: path.into(),
            payload: Some(payload),
        }
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            payload: None,
        }
    }

    /// Returns true when the path needs a setup resource identifier.
    #[must_use]
    pub fn needs_resource(&self) -> bool {
        self.path.contains(ID_PLACEHOLDER)
    }

    /// Resolves the path template against an optional resource identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure::Request`] when the template references `{id}`
    /// but no resource identifier is available.
    pub fn bind(&self, resource_id: Option<&str>) -> Result<String, CaseFailure> {
        if !self.needs_resource() {
            return Ok(self.path.clone());
        }
        resource_id.map(|id| self.path.replace(ID_PLACEHOLDER, id)).ok_or_else(|| {
            CaseFailure::Request(format!("{} requires a setup resource for {ID_PLACEHOLDER}", self.path))
        })
    }
}

/// Returns the item path for a user identifier.
#[must_use]
pub fn user_path(id: &str) -> String {
    USER_PATH_TEMPLATE.replace(ID_PLACEHOLDER, id)
}
