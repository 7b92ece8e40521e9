//! # agb-scenario: AgentBeats Scenario Model and Artifact Generation
//!
//! Turns a declarative `scenario.toml` (one green agent plus a set of
//! participant roles) into deployment artifacts:
//!
//! - `docker-compose.yml`: one service per agent, plus the runner service
//!   that waits for every agent to report healthy.
//! - `runner-scenario.toml`: the scenario rewritten to reference in-network
//!   endpoints instead of images and ports.
//! - `.env.example`: required and optional environment variables, only
//!   when the scenario declares any.
//!
//! ## Pipeline
//!
//! ```text
//! load(path) ──► Document ──► validate() ──► Scenario<'_> ──► ArtifactSet
//!                                                 │
//!                       ┌─────────────────────────┼──────────────────────┐
//!                 generate_compose   generate_runner_scenario   generate_env_example
//! ```
//!
//! Every stage returns a `Result`; nothing here exits the process.

pub mod artifacts;
pub mod compose;
pub mod env_template;
pub mod error;
pub mod loader;
pub mod runner_scenario;
pub mod scenario;
pub mod settings;
pub mod validate;
pub mod value;

pub use artifacts::{ArtifactSet, COMPOSE_FILE, ENV_EXAMPLE_FILE, RUNNER_SCENARIO_FILE};
pub use error::{ScenarioError, ScenarioResult, ValidationError};
pub use loader::{load, Document};
pub use scenario::{Agent, EnvVar, Scenario, GREEN_AGENT_SERVICE, RUNNER_SERVICE};
pub use settings::{ComposeSettings, HealthCheckSettings};
pub use validate::validate;
pub use value::{Mapping, Value};
