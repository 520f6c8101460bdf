// crates/reqres-contract/src/validation.rs
// ============================================================================
// Module: Validation Engine
// Description: Structural conformance checks for response bodies.
// Purpose: Turn schema violations into field-level diagnostics.
// Dependencies: jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Validation is pure: bodies and schemas are borrowed immutably and every
//! violation is collected rather than stopping at the first one. Each
//! [`Violation`] names the field (as a JSON pointer), what the schema expected
//! there, and what the body actually held, so failures can be diagnosed
//! without re-running the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::schemas::CompiledSchema;

// ============================================================================
// SECTION: Failure Types
// ============================================================================

/// Single field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending field (empty for the document root).
    pub pointer: String,
    /// What the schema expected at the pointer.
    pub expected: String,
    /// Value found at the pointer; `None` when the field is absent.
    pub actual: Option<Value>,
}

impl fmt::Display for Violation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() { "/" } else { self.pointer.as_str() };
        match &self.actual {
            Some(actual) => write!(
                formatter,
                "{pointer}: expected {}, got {} {actual}",
                self.expected,
                json_type_name(actual)
            ),
            None => write!(formatter, "{pointer}: expected {}, got nothing", self.expected),
        }
    }
}

/// Body does not conform to a response schema.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("body does not conform to {schema}: {}", join_violations(.violations))]
pub struct ValidationFailure {
    /// Schema label (operation name).
    pub schema: String,
    /// Every violation found in the body.
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Builds a failure for a body that could not be read as JSON.
    #[must_use]
    pub fn not_json(schema: &str, actual: Option<&str>) -> Self {
        Self {
            schema: schema.to_string(),
            violations: vec![Violation {
                pointer: String::new(),
                expected: "a json document".to_string(),
                actual: actual.map(|text| Value::String(text.to_string())),
            }],
        }
    }
}

/// Body differs from an exact expected document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("body mismatch: expected {expected}, got {actual}")]
pub struct BodyMismatch {
    /// Expected document.
    pub expected: Value,
    /// Actual document.
    pub actual: Value,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a body against a compiled schema.
///
/// # Errors
///
/// Returns [`ValidationFailure`] listing every violation when the body does
/// not conform.
pub fn validate(body: &Value, schema: &CompiledSchema) -> Result<(), ValidationFailure> {
    let violations: Vec<Violation> = schema
        .validator()
        .iter_errors(body)
        .map(|error| {
            let base = error.instance_path.to_string();
            match &error.kind {
                ValidationErrorKind::Required {
                    property,
                } => {
                    let name = property.as_str().map_or_else(|| property.to_string(), str::to_string);
                    let pointer = format!("{base}/{}", escape_pointer_token(&name));
                    Violation {
                        expected: expected_at(schema.document(), &pointer)
                            .map_or_else(|| "required field".to_string(), |kind| {
                                format!("required field of type {kind}")
                            }),
                        pointer,
                        actual: None,
                    }
                }
                _ => Violation {
                    expected: expected_at(schema.document(), &base)
                        .map_or_else(|| error.to_string(), |kind| format!("type {kind}")),
                    pointer: base,
                    actual: Some(error.instance.clone().into_owned()),
                },
            }
        })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure {
            schema: schema.operation().as_str().to_string(),
            violations,
        })
    }
}

/// Compares a body against an exact expected document.
///
/// # Errors
///
/// Returns [`BodyMismatch`] when the documents differ.
pub fn expect_exact(actual: &Value, expected: &Value) -> Result<(), BodyMismatch> {
    if actual == expected {
        Ok(())
    } else {
        Err(BodyMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the declared `type` of the subschema describing `pointer`.
fn expected_at(schema: &Value, pointer: &str) -> Option<String> {
    let mut node = schema;
    for token in pointer.split('/').skip(1) {
        let token = unescape_pointer_token(token);
        node = node.get("properties").and_then(|properties| properties.get(token.as_str()))?;
    }
    match node.get("type")? {
        Value::String(kind) => Some(kind.clone()),
        Value::Array(kinds) => {
            Some(kinds.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(" or "))
        }
        _ => None,
    }
}

/// Returns the JSON type name of a value.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Escapes a JSON pointer reference token.
fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescapes a JSON pointer reference token.
fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Joins violations for display.
fn join_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
