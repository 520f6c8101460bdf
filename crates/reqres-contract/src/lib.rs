// crates/reqres-contract/src/lib.rs
// ============================================================================
// Module: Reqres Contract Library
// Description: Response contracts for the reqres user and registration API.
// Purpose: Own the schema registry and the validation engine.
// Dependencies: jsonschema, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate is the single source of truth for what the remote user API is
//! expected to return. Schemas are data files embedded at build time; the
//! validation engine checks bodies against them and reports field-level
//! diagnostics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod schemas;
pub mod types;
pub mod validation;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use schemas::CompiledSchema;
pub use schemas::SchemaError;
pub use schemas::SchemaRegistry;
pub use types::OperationName;
pub use validation::BodyMismatch;
pub use validation::ValidationFailure;
pub use validation::Violation;
pub use validation::expect_exact;
pub use validation::validate;
