// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for reqres system-tests.
// Purpose: Provide the stub service, readiness probes, and artifact utilities.
// Dependencies: system-tests, reqres-client, reqres-harness
// ============================================================================

//! ## Overview
//! Shared helpers for reqres system-tests.
//! - [`reqres_stub`] serves the user API locally with fault injection.
//! - [`readiness`] waits for the stub without arbitrary sleeps.
//! - [`harness`] wires a client, runner, and memory audit sink to the stub.
//! - [`artifacts`] writes per-test summaries and run reports.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]
