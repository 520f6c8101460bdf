// crates/reqres-contract/src/schemas.rs
// ============================================================================
// Module: Schema Registry
// Description: Embedded JSON schema documents keyed by operation name.
// Purpose: Provide read-only, pre-compiled response schemas for validation.
// Dependencies: jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Response schemas are plain JSON documents under `schemas/` at the crate
//! root. They are embedded at build time, parsed and compiled once when the
//! registry is built, and never mutated afterwards.
//!
//! Lookups by string fail closed: an unknown operation name is a
//! configuration error, never a permissive fallback schema.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::types::OperationName;

// ============================================================================
// SECTION: Embedded Documents
// ============================================================================

/// Raw schema document for `get_user`.
const GET_USER_SCHEMA: &str = include_str!("../schemas/get_user.schema.json");
/// Raw schema document for `create_user`.
const CREATE_USER_SCHEMA: &str = include_str!("../schemas/create_user.schema.json");
/// Raw schema document for `update_user`.
const UPDATE_USER_SCHEMA: &str = include_str!("../schemas/update_user.schema.json");
/// Raw schema document for `register_user`.
const REGISTER_USER_SCHEMA: &str = include_str!("../schemas/register_user.schema.json");

/// Returns the embedded schema source for an operation.
#[must_use]
pub const fn schema_source(operation: OperationName) -> &'static str {
    match operation {
        OperationName::GetUser => GET_USER_SCHEMA,
        OperationName::CreateUser => CREATE_USER_SCHEMA,
        OperationName::UpdateUser => UPDATE_USER_SCHEMA,
        OperationName::RegisterUser => REGISTER_USER_SCHEMA,
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema registry configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Requested operation has no registered schema.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    /// Schema document is not valid JSON.
    #[error("schema {operation} is not valid json: {message}")]
    Parse {
        /// Operation whose document failed to parse.
        operation: OperationName,
        /// Parser diagnostic.
        message: String,
    },
    /// Schema document failed to compile.
    #[error("schema {operation} failed to compile: {message}")]
    Compile {
        /// Operation whose document failed to compile.
        operation: OperationName,
        /// Compiler diagnostic.
        message: String,
    },
}

// ============================================================================
// SECTION: Compiled Schema
// ============================================================================

/// Parsed schema document paired with its compiled validator.
pub struct CompiledSchema {
    /// Operation the schema describes.
    operation: OperationName,
    /// Parsed schema document.
    document: Value,
    /// Compiled validator for the document.
    validator: Validator,
}

impl CompiledSchema {
    /// Compiles a schema document for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] when the document is not a valid
    /// draft 2020-12 schema.
    pub fn compile(operation: OperationName, document: Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&document)
            .map_err(|err| SchemaError::Compile {
                operation,
                message: err.to_string(),
            })?;
        Ok(Self {
            operation,
            document,
            validator,
        })
    }

    /// Returns the operation this schema describes.
    #[must_use]
    pub const fn operation(&self) -> OperationName {
        self.operation
    }

    /// Returns the parsed schema document.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// Returns the compiled validator.
    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CompiledSchema")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Read-only registry of compiled response schemas.
#[derive(Debug)]
pub struct SchemaRegistry {
    /// Compiled schemas keyed by operation.
    schemas: BTreeMap<OperationName, CompiledSchema>,
}

impl SchemaRegistry {
    /// Builds the registry from the embedded schema documents.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when an embedded document fails to parse or
    /// compile.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut schemas = BTreeMap::new();
        for operation in OperationName::all() {
            let document: Value =
                serde_json::from_str(schema_source(*operation)).map_err(|err| {
                    SchemaError::Parse {
                        operation: *operation,
                        message: err.to_string(),
                    }
                })?;
            schemas.insert(*operation, CompiledSchema::compile(*operation, document)?);
        }
        Ok(Self {
            schemas,
        })
    }

    /// Returns the compiled schema for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownOperation`] when the registry has no
    /// schema for the operation.
    pub fn get(&self, operation: OperationName) -> Result<&CompiledSchema, SchemaError> {
        self.schemas
            .get(&operation)
            .ok_or_else(|| SchemaError::UnknownOperation(operation.as_str().to_string()))
    }

    /// Looks up a compiled schema by operation name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownOperation`] when the name is not a known
    /// operation.
    pub fn lookup(&self, name: &str) -> Result<&CompiledSchema, SchemaError> {
        let operation =
            OperationName::parse(name).ok_or_else(|| SchemaError::UnknownOperation(name.to_string()))?;
        self.get(operation)
    }

    /// Returns the raw schema document for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownOperation`] when the registry has no
    /// schema for the operation.
    pub fn document(&self, operation: OperationName) -> Result<&Value, SchemaError> {
        self.get(operation).map(CompiledSchema::document)
    }

    /// Returns the registered operations in canonical order.
    pub fn operations(&self) -> impl Iterator<Item = OperationName> + '_ {
        self.schemas.keys().copied()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
