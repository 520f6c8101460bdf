// crates/reqres-client/src/lib.rs
// ============================================================================
// Module: Reqres Client Library
// Description: HTTP client wrapper for the reqres user and registration API.
// Purpose: Provide injected configuration, single-attempt calls, and audit logs.
// Dependencies: reqwest, serde, serde_json, thiserror, toml, url
// ============================================================================

//! ## Overview
//! The client issues `GET`/`POST`/`PUT`/`DELETE` calls against a configured
//! base URL and returns a [`ResponseRecord`] for every response the service
//! sends. Calls that cannot complete surface as [`ClientError::Transport`], so
//! callers can tell "the service answered 404" from "the service never
//! answered".

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod client;
pub mod config;
pub mod response;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use audit::HarnessAuditSink;
pub use audit::MemoryAuditSink;
pub use client::ApiClient;
pub use client::ClientError;
pub use client::HttpMethod;
pub use config::AuditSinkConfig;
pub use config::ClientConfig;
pub use config::ConfigError;
pub use response::ResponseBody;
pub use response::ResponseRecord;
