//! # Runner Scenario Generation
//!
//! Rewrites the scenario for the runner container: deployment metadata
//! (`image`, `port`, role `name`) is replaced by in-network endpoints, and
//! everything else is carried over.
//!
//! ```toml
//! [green_agent]
//! endpoint = "http://green-agent:8080"
//! # ...other green_agent fields...
//!
//! [[participants]]
//! role = "debater"
//! endpoint = "http://debater:9000"
//! # ...other role fields...
//!
//! [metadata]          # any other section, copied through
//! owner = "x"
//! ```
//!
//! Environment declarations are re-emitted as `[[green_agent.environment]]`
//! and `[[participants.environment]]` tables. Top-level keys that are not
//! tables go before the first header so the output stays valid TOML.

use crate::scenario::{Agent, EnvVar, Scenario};
use crate::value::{render_key, Value};

/// Generate the runner scenario document.
pub fn generate_runner_scenario(scenario: &Scenario<'_>) -> String {
    let mut out = String::new();

    let (sections, top_level): (Vec<_>, Vec<_>) = scenario
        .extra_sections()
        .partition(|(_, value)| matches!(value, Value::Mapping(_)));

    if !top_level.is_empty() {
        for (key, value) in &top_level {
            push_field(&mut out, key, value);
        }
        out.push('\n');
    }

    out.push_str("[green_agent]\n");
    push_agent_body(&mut out, &scenario.green_agent, "green_agent.environment");

    // Sections are separated by one blank line; the file ends with a single newline.
    for role in &scenario.roles {
        out.push_str("\n[[participants]]\n");
        push_field(&mut out, "role", &Value::String(role.service.to_string()));
        push_agent_body(&mut out, role, "participants.environment");
    }

    for (name, value) in &sections {
        out.push_str(&format!("\n[{}]\n", render_key(name)));
        if let Value::Mapping(entries) = value {
            for (key, value) in entries {
                push_field(&mut out, key, value);
            }
        }
    }

    out
}

fn push_agent_body(out: &mut String, agent: &Agent<'_>, environment_header: &str) {
    push_field(out, "endpoint", &Value::String(agent.endpoint()));
    for (key, value) in &agent.extra_fields {
        push_field(out, key, value);
    }
    if !agent.environment.is_empty() {
        out.push('\n');
        for var in &agent.environment {
            push_env_table(out, var, environment_header);
        }
    }
}

fn push_env_table(out: &mut String, var: &EnvVar<'_>, header: &str) {
    out.push_str(&format!("[[{header}]]\n"));
    push_field(out, "name", &Value::String(var.name.to_string()));
    if let Some(default) = var.default_text() {
        push_field(out, "default", &Value::String(default));
    }
}

fn push_field(out: &mut String, key: &str, value: &Value) {
    out.push_str(&render_key(key));
    out.push_str(" = ");
    out.push_str(&value.to_toml_literal());
    out.push('\n');
}
