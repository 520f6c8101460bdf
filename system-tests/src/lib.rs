// system-tests/src/lib.rs
// ============================================================================
// Module: Reqres System Tests Library
// Description: Shared configuration for system test suites.
// Purpose: Provide common settings for the stub-backed and live suites.
// Dependencies: reqres-client
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. The `contract` binary runs every suite against a
//! local stub of the user API; the `live` binary runs the scenario table
//! against the configured remote service.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
