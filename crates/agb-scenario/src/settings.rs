//! # Compose Settings
//!
//! Fixed parameters of the generated `docker-compose.yml` that are not part
//! of the scenario itself: the runner image, the shared network, and the
//! health probe timings. The defaults reproduce the standard AgentBeats
//! deployment; a YAML settings file may override any subset of them.
//!
//! ```yaml
//! runner_image: ghcr.io/agentbeats/agentbeats-runner:1.2.0
//! healthcheck:
//!   retries: 20
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ScenarioError, ScenarioResult};

/// Image the runner service starts from unless overridden.
pub const DEFAULT_RUNNER_IMAGE: &str = "ghcr.io/komyo-ai/agentbeats-runner:latest";

/// Parameters for compose generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeSettings {
    /// Image of the companion runner service.
    pub runner_image: String,
    /// Name of the network every service joins.
    pub network_name: String,
    /// Driver of that network.
    pub network_driver: String,
    /// Host directory mounted as the runner's output directory.
    pub output_mount: String,
    /// Health probe timings applied to every agent service.
    pub healthcheck: HealthCheckSettings,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            runner_image: DEFAULT_RUNNER_IMAGE.to_string(),
            network_name: "agent-network".to_string(),
            network_driver: "bridge".to_string(),
            output_mount: "./output".to_string(),
            healthcheck: HealthCheckSettings::default(),
        }
    }
}

impl ComposeSettings {
    /// Parse settings from YAML. Missing fields keep their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserialises to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Settings`] if the file cannot be read or
    /// contains unknown or mistyped fields.
    pub fn from_yaml_file(path: &Path) -> ScenarioResult<Self> {
        let settings_error = |reason: String| ScenarioError::Settings {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
        Self::from_yaml_str(&content).map_err(|e| settings_error(e.to_string()))
    }
}

/// Docker health probe timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthCheckSettings {
    /// Time between agent card probes.
    pub interval: String,
    /// How long a single probe may take.
    pub timeout: String,
    /// Consecutive failures before the agent is marked unhealthy.
    pub retries: u32,
    /// Grace period before failed probes count.
    pub start_period: String,
}

impl Default for HealthCheckSettings {
    fn default() -> Self {
        Self {
            interval: "5s".to_string(),
            timeout: "3s".to_string(),
            retries: 10,
            start_period: "30s".to_string(),
        }
    }
}
