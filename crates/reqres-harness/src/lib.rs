// crates/reqres-harness/src/lib.rs
// ============================================================================
// Module: Reqres Harness Library
// Description: Contract scenarios, runner, and scoped resources.
// Purpose: Turn the scenario table into pass/fail outcomes with diagnostics.
// Dependencies: reqres-client, reqres-contract, serde, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! The harness drives the reqres user API through a table of [`Scenario`]
//! rows. Each row is executed by [`ScenarioRunner`], which checks status
//! before body, validates bodies against the schema registry, and releases
//! any resource it created on every exit path.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod lifecycle;
pub mod outcome;
pub mod request;
pub mod runner;
pub mod scenarios;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use lifecycle::ScopedUser;
pub use outcome::CaseFailure;
pub use outcome::RunReport;
pub use outcome::SetupError;
pub use outcome::TeardownError;
pub use outcome::TestOutcome;
pub use request::RequestSpec;
pub use runner::ScenarioRunner;
pub use scenarios::BodyExpectation;
pub use scenarios::FieldCheck;
pub use scenarios::FieldRule;
pub use scenarios::Scenario;
pub use scenarios::user_scenarios;
