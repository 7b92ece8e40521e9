//! # Deployment Artifacts
//!
//! Computes the three generated files for a scenario and writes them into an
//! output directory. Generation is pure: the same scenario and settings
//! always produce byte-identical files.

use std::path::{Path, PathBuf};

use crate::compose::generate_compose;
use crate::env_template::generate_env_example;
use crate::error::{ScenarioError, ScenarioResult};
use crate::runner_scenario::generate_runner_scenario;
use crate::scenario::Scenario;
use crate::settings::ComposeSettings;

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const RUNNER_SCENARIO_FILE: &str = "runner-scenario.toml";
pub const ENV_EXAMPLE_FILE: &str = ".env.example";

/// Generated contents of every artifact for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub compose: String,
    pub runner_scenario: String,
    /// `None` when the scenario declares no environment variables.
    pub env_example: Option<String>,
}

impl ArtifactSet {
    pub fn generate(scenario: &Scenario<'_>, settings: &ComposeSettings) -> Self {
        Self {
            compose: generate_compose(scenario, settings),
            runner_scenario: generate_runner_scenario(scenario),
            env_example: generate_env_example(scenario),
        }
    }

    /// `(file name, contents)` pairs in write order. The env template is
    /// only included when it exists.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            Some((COMPOSE_FILE, self.compose.as_str())),
            Some((RUNNER_SCENARIO_FILE, self.runner_scenario.as_str())),
            self.env_example
                .as_deref()
                .map(|contents| (ENV_EXAMPLE_FILE, contents)),
        ]
        .into_iter()
        .flatten()
    }

    pub fn has_env_example(&self) -> bool {
        self.env_example.is_some()
    }

    /// Write every artifact into `dir`, which must already exist.
    ///
    /// Returns the written paths in write order.
    pub fn write_all(&self, dir: &Path) -> ScenarioResult<Vec<PathBuf>> {
        self.iter()
            .map(|(file_name, contents)| write_artifact(dir, file_name, contents))
            .collect()
    }
}

/// Write a single artifact, replacing any existing file.
///
/// # Errors
///
/// Returns [`ScenarioError::Write`] naming the target path.
pub fn write_artifact(dir: &Path, file_name: &str, contents: &str) -> ScenarioResult<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, contents).map_err(|source| ScenarioError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(path)
}
