// crates/reqres-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Canonical operation identifiers for the reqres user API.
// Purpose: Shared operation naming across schemas, validation, and scenarios.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical operation identifiers. Each operation owns exactly one response
//! schema in the registry; the names are part of the contract surface and are
//! used verbatim in schema file names and diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Operation Names
// ============================================================================

/// Logical operations with a declared response schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationName {
    /// Fetch a single user (`GET /api/users/{id}`).
    GetUser,
    /// Create a user (`POST /api/users`).
    CreateUser,
    /// Update a user (`PUT /api/users/{id}`).
    UpdateUser,
    /// Register an account (`POST /api/register`).
    RegisterUser,
}

impl OperationName {
    /// Returns the canonical string name for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetUser => "get_user",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::RegisterUser => "register_user",
        }
    }

    /// Returns all operation names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::GetUser, Self::CreateUser, Self::UpdateUser, Self::RegisterUser]
    }

    /// Parses an operation name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get_user" => Some(Self::GetUser),
            "create_user" => Some(Self::CreateUser),
            "update_user" => Some(Self::UpdateUser),
            "register_user" => Some(Self::RegisterUser),
            _ => None,
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
