// crates/reqres-client/src/response.rs
// ============================================================================
// Module: Response Records
// Description: Status code plus classified body for a single HTTP call.
// Purpose: Give callers an owned, inspectable view of what the service sent.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ResponseRecord`] is produced per call and owned by whoever issued it.
//! Any status, including 4xx and 5xx, is a valid record; only transport
//! failures are errors.

use serde::Serialize;
use serde_json::Value;

/// Maximum characters of a text body kept in diagnostics.
const DESCRIBE_LIMIT: usize = 256;

/// Classified response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// No body bytes (or only whitespace).
    Empty,
    /// Body parsed as JSON.
    Json(Value),
    /// Body that is not JSON, kept as lossy UTF-8.
    Text(String),
}

impl ResponseBody {
    /// Classifies raw body bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        serde_json::from_slice(bytes).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            Self::Json,
        )
    }

    /// Returns the JSON document when the body parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Empty | Self::Text(_) => None,
        }
    }

    /// Returns a short human-readable rendering for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Empty => "<empty>".to_string(),
            Self::Json(value) => truncate(&value.to_string()),
            Self::Text(text) => truncate(text),
        }
    }
}

/// Status code and body of a completed HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseRecord {
    /// HTTP status code.
    pub status: u16,
    /// Classified body.
    pub body: ResponseBody,
}

impl ResponseRecord {
    /// Builds a record from a status and raw body bytes.
    #[must_use]
    pub fn from_parts(status: u16, bytes: &[u8]) -> Self {
        Self {
            status,
            body: ResponseBody::from_bytes(bytes),
        }
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        self.body.as_json()
    }

    /// Returns the value at a JSON pointer in the body.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.json().and_then(|body| body.pointer(pointer))
    }

    /// Returns a string-or-number field at a JSON pointer as text.
    #[must_use]
    pub fn text_at(&self, pointer: &str) -> Option<String> {
        match self.pointer(pointer)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

/// Truncates diagnostics to a bounded length on a char boundary.
fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIBE_LIMIT {
        return text.to_string();
    }
    let mut out: String = text.chars().take(DESCRIBE_LIMIT).collect();
    out.push('…');
    out
}
