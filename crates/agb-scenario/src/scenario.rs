//! # Validated Scenario View
//!
//! [`Scenario`] is what [`crate::validate::validate`] hands to the
//! generators: typed access to the green agent, the participant roles, and
//! their environment declarations, borrowed from the loaded [`Document`]
//! without copying or normalising it.

use std::iter;

use crate::loader::Document;
use crate::value::Value;

/// Service identifier of the green agent in every generated artifact.
pub const GREEN_AGENT_SERVICE: &str = "green-agent";

/// Service identifier of the companion runner.
pub const RUNNER_SERVICE: &str = "agentbeats-runner";

/// Section keys consumed by the generators; every other top-level section is
/// copied through to the runner scenario.
pub const KNOWN_SECTIONS: [&str; 2] = ["green_agent", "participants"];

/// Green-agent keys that describe the container rather than the agent.
pub const GREEN_AGENT_DEPLOY_KEYS: [&str; 3] = ["image", "port", "environment"];

/// Role keys that describe the container rather than the agent.
pub const ROLE_DEPLOY_KEYS: [&str; 4] = ["name", "image", "port", "environment"];

/// A validated scenario, borrowed from its source document.
#[derive(Debug, Clone)]
pub struct Scenario<'a> {
    pub(crate) document: &'a Document,
    pub green_agent: Agent<'a>,
    /// Participant roles in document order. Never empty.
    pub roles: Vec<Agent<'a>>,
}

impl<'a> Scenario<'a> {
    /// The document this view was validated from.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Green agent first, then roles in document order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent<'a>> {
        iter::once(&self.green_agent).chain(self.roles.iter())
    }

    /// Service identifiers of every agent, in [`Scenario::agents`] order.
    pub fn service_names(&self) -> Vec<&'a str> {
        self.agents().map(|agent| agent.service).collect()
    }

    /// Top-level entries other than `green_agent` and `participants`.
    pub fn extra_sections(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.document
            .iter()
            .filter(|(key, _)| !KNOWN_SECTIONS.contains(key))
    }

    /// Whether any agent declares at least one environment variable.
    pub fn has_environment(&self) -> bool {
        self.agents().any(|agent| !agent.environment.is_empty())
    }
}

/// One containerised agent: the green agent or a participant role.
#[derive(Debug, Clone)]
pub struct Agent<'a> {
    /// Compose service identifier and network hostname.
    pub service: &'a str,
    pub image: &'a str,
    pub port: u16,
    pub environment: Vec<EnvVar<'a>>,
    /// Non-deployment fields in document order, copied verbatim to the
    /// runner scenario.
    pub extra_fields: Vec<(&'a str, &'a Value)>,
}

impl Agent<'_> {
    /// In-network URL of the agent, e.g. `http://green-agent:8080`.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.service, self.port)
    }
}

/// An environment variable declaration.
///
/// A declaration with a `default` is optional; one without is a required
/// secret that the operator supplies at deploy time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvVar<'a> {
    pub name: &'a str,
    pub default: Option<&'a Value>,
}

impl EnvVar<'_> {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Default rendered as plain text (`gpt-4`, `8080`, `true`).
    pub fn default_text(&self) -> Option<String> {
        self.default.map(Value::to_plain_text)
    }
}
