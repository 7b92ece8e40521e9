//! # Compose Generation
//!
//! Renders a validated [`Scenario`] as a `docker-compose.yml`:
//!
//! ```text
//! services
//! ├── green-agent        depends_on: every role (started)
//! ├── <role>...          one per participants.required_roles entry
//! └── agentbeats-runner  depends_on: every agent (service_healthy)
//! networks
//! └── agent-network      bridge
//! ```
//!
//! Every agent container is started with
//! `--host 0.0.0.0 --port <port> --card-url http://<service>:<port>` and
//! probed by fetching its agent card from `localhost:<port>`. The file is
//! always regenerated in full; nothing is merged with an existing compose
//! file.

use std::borrow::Cow;

use crate::artifacts::RUNNER_SCENARIO_FILE;
use crate::scenario::{Agent, EnvVar, Scenario, RUNNER_SERVICE};
use crate::settings::ComposeSettings;

/// Path every agent serves its card on; the health probe fetches it.
pub const AGENT_CARD_PATH: &str = "/.well-known/agent-card.json";

/// Where the runner sees the rewritten scenario inside its container.
pub const RUNNER_SCENARIO_MOUNT: &str = "/scenario/scenario.toml";

/// Runner output directory inside its container.
pub const RUNNER_OUTPUT_MOUNT: &str = "/app/output";

/// In-container path of the score file the runner writes.
pub const RUNNER_SCORE_FILE: &str = "/app/output/score.json";

/// Generate the complete compose document.
pub fn generate_compose(scenario: &Scenario<'_>, settings: &ComposeSettings) -> String {
    let mut out = String::new();

    out.push_str("# Auto-generated Docker Compose file from scenario.toml\n");
    out.push_str("# Do not edit manually - regenerate using agb-compose\n");
    out.push('\n');
    out.push_str("version: '3.8'\n");
    out.push('\n');
    out.push_str("services:\n");

    let role_services: Vec<&str> = scenario.roles.iter().map(|r| r.service).collect();
    push_agent_service(&mut out, &scenario.green_agent, &role_services, settings);
    for role in &scenario.roles {
        push_agent_service(&mut out, role, &[], settings);
    }
    push_runner_service(&mut out, &scenario.service_names(), settings);

    out.push_str("networks:\n");
    out.push_str(&format!("  {}:\n", yaml_scalar(&settings.network_name)));
    out.push_str(&format!(
        "    driver: {}\n",
        yaml_scalar(&settings.network_driver)
    ));

    out
}

fn push_agent_service(
    out: &mut String,
    agent: &Agent<'_>,
    depends_on: &[&str],
    settings: &ComposeSettings,
) {
    let service = yaml_scalar(agent.service);
    let port = agent.port;
    let health = &settings.healthcheck;
    tracing::debug!(service = agent.service, port, "rendering agent service");

    out.push_str(&format!("  {service}:\n"));
    out.push_str(&format!("    image: {}\n", yaml_scalar(agent.image)));
    out.push_str(&format!("    container_name: {service}\n"));
    out.push_str(&format!(
        "    command: [\"--host\", \"0.0.0.0\", \"--port\", \"{port}\", \"--card-url\", \"{}\"]\n",
        agent.endpoint()
    ));
    out.push_str("    healthcheck:\n");
    out.push_str(&format!(
        "      test: [\"CMD\", \"python\", \"-c\", \"import urllib.request; \
         urllib.request.urlopen('http://localhost:{port}{AGENT_CARD_PATH}')\"]\n"
    ));
    out.push_str(&format!("      interval: {}\n", yaml_scalar(&health.interval)));
    out.push_str(&format!("      timeout: {}\n", yaml_scalar(&health.timeout)));
    out.push_str(&format!("      retries: {}\n", health.retries));
    out.push_str(&format!(
        "      start_period: {}\n",
        yaml_scalar(&health.start_period)
    ));

    if !agent.environment.is_empty() {
        out.push_str("    environment:\n");
        for var in &agent.environment {
            out.push_str(&format!("      - {}\n", yaml_scalar(&env_assignment(var))));
        }
    }

    if !depends_on.is_empty() {
        out.push_str("    depends_on:\n");
        for dependency in depends_on {
            out.push_str(&format!("      - {}\n", yaml_scalar(dependency)));
        }
    }

    out.push_str("    networks:\n");
    out.push_str(&format!("      - {}\n", yaml_scalar(&settings.network_name)));
    out.push('\n');
}

fn push_runner_service(out: &mut String, agents: &[&str], settings: &ComposeSettings) {
    out.push_str(&format!("  {RUNNER_SERVICE}:\n"));
    out.push_str(&format!("    image: {}\n", yaml_scalar(&settings.runner_image)));
    out.push_str(&format!("    container_name: {RUNNER_SERVICE}\n"));
    out.push_str("    volumes:\n");
    out.push_str(&format!(
        "      - {}\n",
        yaml_scalar(&format!("./{RUNNER_SCENARIO_FILE}:{RUNNER_SCENARIO_MOUNT}"))
    ));
    out.push_str(&format!(
        "      - {}\n",
        yaml_scalar(&format!("{}:{RUNNER_OUTPUT_MOUNT}", settings.output_mount))
    ));
    out.push_str(&format!(
        "    command: [\"{RUNNER_SCENARIO_MOUNT}\", \"{RUNNER_SCORE_FILE}\"]\n"
    ));
    out.push_str("    depends_on:\n");
    for service in agents {
        out.push_str(&format!("      {}:\n", yaml_scalar(service)));
        out.push_str("        condition: service_healthy\n");
    }
    out.push_str("    networks:\n");
    out.push_str(&format!("      - {}\n", yaml_scalar(&settings.network_name)));
    out.push('\n');
}

/// `NAME=default` for optional variables, `NAME=${NAME}` for required ones.
///
/// Literal defaults have `$` doubled so compose does not interpolate them.
fn env_assignment(var: &EnvVar<'_>) -> String {
    match var.default_text() {
        Some(default) => format!("{}={}", var.name, default.replace('$', "$$")),
        None => format!("{name}=${{{name}}}", name = var.name),
    }
}

/// Emit `s` as a plain YAML scalar, double-quoting it when a plain scalar
/// would be misread (as a number, boolean, null, mapping, or comment).
pub(crate) fn yaml_scalar(s: &str) -> Cow<'_, str> {
    if !needs_quoting(s) {
        return Cow::Borrowed(s);
    }
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\u{85}' => quoted.push_str("\\N"),
            '\u{2028}' => quoted.push_str("\\L"),
            '\u{2029}' => quoted.push_str("\\P"),
            c if needs_escape(c) => quoted.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

fn needs_quoting(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if first.is_whitespace() || "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return true;
    }
    if s.ends_with(|c: char| c.is_whitespace() || c == ':') {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.contains(needs_escape) {
        return true;
    }
    let lower = s.to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "null" | "~"
    ) {
        return true;
    }
    let unsigned = lower.trim_start_matches(['+', '-']);
    s.parse::<f64>().is_ok()
        || matches!(unsigned, ".inf" | ".nan")
        || ["0x", "0o", "0b"].iter().any(|radix| unsigned.starts_with(*radix))
}

/// Characters YAML reads as line breaks or rejects outright; they only
/// survive inside a double-quoted scalar as escapes.
fn needs_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}'
        )
}
