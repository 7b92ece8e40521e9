//! # Scenario Validation
//!
//! Checks the structural prerequisites of a loaded [`Document`] and returns a
//! typed [`Scenario`] view over it.
//!
//! ## Check order
//!
//! 1. `green_agent` present.
//! 2. `green_agent.image` present.
//! 3. `green_agent.port` present.
//! 4. `participants.required_roles` has at least one entry.
//! 5. Each role has `name`, `image`, and `port`.
//!
//! After the presence checks come the stricter ones: field types, port
//! range, service and variable names, role-name uniqueness, and keys the
//! runner scenario reserves for itself. The first failure is returned.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::loader::Document;
use crate::scenario::{
    Agent, EnvVar, Scenario, GREEN_AGENT_DEPLOY_KEYS, GREEN_AGENT_SERVICE, ROLE_DEPLOY_KEYS,
    RUNNER_SERVICE,
};
use crate::value::{Mapping, Value};

/// Validate a loaded document.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, in the order listed in the
/// module documentation.
pub fn validate(document: &Document) -> Result<Scenario<'_>, ValidationError> {
    let green = document
        .get("green_agent")
        .ok_or_else(|| missing("green_agent"))?;
    let green = expect_mapping(green, "green_agent")?;
    for field in ["image", "port"] {
        require(green, "green_agent", field)?;
    }

    let roles: &[Value] = match document.get("participants") {
        None => &[],
        Some(participants) => {
            let participants = expect_mapping(participants, "participants")?;
            match participants.get("required_roles") {
                None => &[],
                Some(value) => value.as_sequence().ok_or_else(|| {
                    wrong_type("participants.required_roles", "an array", value)
                })?,
            }
        }
    };
    if roles.is_empty() {
        return Err(ValidationError::NoParticipants);
    }

    let mut role_tables = Vec::with_capacity(roles.len());
    for (i, role) in roles.iter().enumerate() {
        let path = format!("participants.required_roles[{i}]");
        let table = expect_mapping(role, &path)?;
        for field in ["name", "image", "port"] {
            require(table, &path, field)?;
        }
        role_tables.push((path, table));
    }

    let green_agent = agent(
        GREEN_AGENT_SERVICE,
        green,
        "green_agent",
        &GREEN_AGENT_DEPLOY_KEYS,
        &["endpoint"],
    )?;

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut agents = Vec::with_capacity(role_tables.len());
    for (i, (path, table)) in role_tables.into_iter().enumerate() {
        let path = path.as_str();
        let name = string_field(table, path, "name")?;
        check_service_name(name, &format!("{path}.name"))?;
        if let Some(&first) = seen.get(name) {
            return Err(ValidationError::DuplicateRole {
                name: name.to_string(),
                first,
                second: i,
            });
        }
        seen.insert(name, i);
        agents.push(agent(
            name,
            table,
            path,
            &ROLE_DEPLOY_KEYS,
            &["role", "endpoint"],
        )?);
    }

    tracing::debug!(roles = agents.len(), "scenario validated");
    Ok(Scenario {
        document,
        green_agent,
        roles: agents,
    })
}

fn agent<'a>(
    service: &'a str,
    table: &'a Mapping,
    path: &str,
    deploy_keys: &[&str],
    reserved_keys: &[&str],
) -> Result<Agent<'a>, ValidationError> {
    let image = string_field(table, path, "image")?;
    let port = port_field(table, path)?;
    let environment = match table.get("environment") {
        Some(value) => env_vars(value, &format!("{path}.environment"))?,
        None => Vec::new(),
    };

    let mut extra_fields = Vec::new();
    for (key, value) in table {
        let key = key.as_str();
        if deploy_keys.contains(&key) {
            continue;
        }
        if reserved_keys.contains(&key) {
            return Err(ValidationError::ReservedField {
                path: format!("{path}.{key}"),
            });
        }
        extra_fields.push((key, value));
    }

    Ok(Agent {
        service,
        image,
        port,
        environment,
        extra_fields,
    })
}

fn env_vars<'a>(value: &'a Value, path: &str) -> Result<Vec<EnvVar<'a>>, ValidationError> {
    let entries = value
        .as_sequence()
        .ok_or_else(|| wrong_type(path, "an array of tables", value))?;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let entry_path = format!("{path}[{i}]");
            let table = expect_mapping(entry, &entry_path)?;
            let name = string_field(table, &entry_path, "name")?;
            check_env_name(name, &format!("{entry_path}.name"))?;
            let default = table.get("default");
            if let Some(default) = default.filter(|v| !v.is_scalar()) {
                return Err(wrong_type(
                    &format!("{entry_path}.default"),
                    "a scalar",
                    default,
                ));
            }
            Ok(EnvVar { name, default })
        })
        .collect()
}

fn require<'a>(table: &'a Mapping, path: &str, field: &str) -> Result<&'a Value, ValidationError> {
    table
        .get(field)
        .ok_or_else(|| missing(&format!("{path}.{field}")))
}

fn string_field<'a>(
    table: &'a Mapping,
    path: &str,
    field: &str,
) -> Result<&'a str, ValidationError> {
    let value = require(table, path, field)?;
    value
        .as_str()
        .ok_or_else(|| wrong_type(&format!("{path}.{field}"), "a string", value))
}

fn port_field(table: &Mapping, path: &str) -> Result<u16, ValidationError> {
    let value = require(table, path, "port")?;
    let field_path = format!("{path}.port");
    let port = value
        .as_integer()
        .ok_or_else(|| wrong_type(&field_path, "an integer", value))?;
    u16::try_from(port)
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ValidationError::PortOutOfRange {
            path: field_path,
            value: port,
        })
}

fn expect_mapping<'a>(value: &'a Value, path: &str) -> Result<&'a Mapping, ValidationError> {
    value
        .as_mapping()
        .ok_or_else(|| wrong_type(path, "a table", value))
}

// Compose service names double as hostnames on the agent network.
fn check_service_name(name: &str, path: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid {
        return Err(invalid_name(
            path,
            name,
            "service names must start with a letter or digit and contain only letters, digits, '_', '.', or '-'",
        ));
    }
    if name == GREEN_AGENT_SERVICE || name == RUNNER_SERVICE {
        return Err(invalid_name(path, name, "name is reserved for a generated service"));
    }
    Ok(())
}

fn check_env_name(name: &str, path: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(invalid_name(
            path,
            name,
            "environment variable names must match [A-Za-z_][A-Za-z0-9_]*",
        ))
    }
}

fn missing(path: &str) -> ValidationError {
    ValidationError::MissingField {
        path: path.to_string(),
    }
}

fn wrong_type(path: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::WrongType {
        path: path.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn invalid_name(path: &str, name: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidName {
        path: path.to_string(),
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
[green_agent]
image = "img:latest"
port = 8080
description = "judge"

[[green_agent.environment]]
name = "OPENAI_API_KEY"

[[participants.required_roles]]
name = "debater"
image = "d:latest"
port = 9000

[[participants.required_roles.environment]]
name = "MODEL"
default = "gpt-4"
"#;

    fn doc(toml: &str) -> Document {
        Document::from_toml_str(toml).unwrap()
    }

    fn err(toml: &str) -> ValidationError {
        validate(&doc(toml)).unwrap_err()
    }

    fn missing_path(toml: &str) -> String {
        match err(toml) {
            ValidationError::MissingField { path } => path,
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn valid_document_produces_typed_view() {
        let document = doc(VALID);
        let scenario = validate(&document).unwrap();
        assert_eq!(scenario.green_agent.service, "green-agent");
        assert_eq!(scenario.green_agent.image, "img:latest");
        assert_eq!(scenario.green_agent.port, 8080);
        assert_eq!(scenario.green_agent.environment.len(), 1);
        assert!(scenario.green_agent.environment[0].is_required());
        assert_eq!(scenario.green_agent.extra_fields.len(), 1);
        assert_eq!(scenario.green_agent.extra_fields[0].0, "description");

        assert_eq!(scenario.roles.len(), 1);
        let debater = &scenario.roles[0];
        assert_eq!(debater.service, "debater");
        assert_eq!(debater.endpoint(), "http://debater:9000");
        assert_eq!(debater.environment[0].default_text().as_deref(), Some("gpt-4"));
        assert!(std::ptr::eq(scenario.document(), &document));
    }

    #[test]
    fn missing_green_agent() {
        assert_eq!(missing_path("[participants]\n"), "green_agent");
    }

    #[test]
    fn missing_green_agent_image() {
        let toml = VALID.replace("image = \"img:latest\"\n", "");
        assert_eq!(missing_path(&toml), "green_agent.image");
    }

    #[test]
    fn missing_green_agent_port() {
        let toml = VALID.replace("port = 8080\n", "");
        assert_eq!(missing_path(&toml), "green_agent.port");
    }

    #[test]
    fn missing_participants_section() {
        let toml = "[green_agent]\nimage = \"a\"\nport = 1\n";
        assert_eq!(err(toml), ValidationError::NoParticipants);
    }

    #[test]
    fn empty_required_roles() {
        let toml = "[green_agent]\nimage = \"a\"\nport = 1\n[participants]\nrequired_roles = []\n";
        assert_eq!(err(toml), ValidationError::NoParticipants);
    }

    #[test]
    fn missing_role_fields_include_the_index() {
        let base = r#"
[green_agent]
image = "a"
port = 1

[[participants.required_roles]]
name = "pro"
image = "p"
port = 2

[[participants.required_roles]]
"#;
        assert_eq!(
            missing_path(&format!("{base}image = \"c\"\nport = 3\n")),
            "participants.required_roles[1].name"
        );
        assert_eq!(
            missing_path(&format!("{base}name = \"con\"\nport = 3\n")),
            "participants.required_roles[1].image"
        );
        assert_eq!(
            missing_path(&format!("{base}name = \"con\"\nimage = \"c\"\n")),
            "participants.required_roles[1].port"
        );
    }

    #[test]
    fn presence_is_checked_before_types() {
        // Role 0 has a bad port type, role 1 is missing its name: presence wins.
        let toml = r#"
[green_agent]
image = "a"
port = 1

[[participants.required_roles]]
name = "pro"
image = "p"
port = "2"

[[participants.required_roles]]
image = "c"
port = 3
"#;
        assert_eq!(missing_path(toml), "participants.required_roles[1].name");
    }

    #[test]
    fn missing_field_message_matches_operator_output() {
        let toml = VALID.replace("port = 8080\n", "");
        assert_eq!(
            err(&toml).to_string(),
            "required field 'green_agent.port' not found in TOML"
        );
        assert_eq!(
            ValidationError::NoParticipants.to_string(),
            "at least one participant role is required"
        );
    }

    #[test]
    fn port_must_be_an_integer_in_range() {
        let toml = VALID.replace("port = 8080", "port = \"8080\"");
        assert!(matches!(err(&toml), ValidationError::WrongType { ref path, .. } if path == "green_agent.port"));

        let toml = VALID.replace("port = 9000", "port = 70000");
        assert_eq!(
            err(&toml),
            ValidationError::PortOutOfRange {
                path: "participants.required_roles[0].port".into(),
                value: 70000,
            }
        );

        let toml = VALID.replace("port = 8080", "port = 0");
        assert!(matches!(err(&toml), ValidationError::PortOutOfRange { .. }));
    }

    #[test]
    fn image_must_be_a_string() {
        let toml = VALID.replace("image = \"d:latest\"", "image = 3");
        assert_eq!(
            err(&toml),
            ValidationError::WrongType {
                path: "participants.required_roles[0].image".into(),
                expected: "a string",
                found: "an integer",
            }
        );
    }

    #[test]
    fn duplicate_role_names_are_rejected() {
        let toml = format!(
            "{VALID}\n[[participants.required_roles]]\nname = \"debater\"\nimage = \"x\"\nport = 9001\n"
        );
        assert_eq!(
            err(&toml),
            ValidationError::DuplicateRole {
                name: "debater".into(),
                first: 0,
                second: 1,
            }
        );
    }

    #[test]
    fn role_names_must_be_usable_service_names() {
        let toml = VALID.replace("name = \"debater\"", "name = \"green-agent\"");
        assert!(matches!(err(&toml), ValidationError::InvalidName { ref name, .. } if name == "green-agent"));

        let toml = VALID.replace("name = \"debater\"", "name = \"two words\"");
        assert!(matches!(err(&toml), ValidationError::InvalidName { ref path, .. }
            if path == "participants.required_roles[0].name"));
    }

    #[test]
    fn environment_entries_are_checked() {
        let toml = VALID.replace("name = \"OPENAI_API_KEY\"", "name = \"OPENAI-KEY\"");
        assert!(matches!(err(&toml), ValidationError::InvalidName { ref path, .. }
            if path == "green_agent.environment[0].name"));

        let toml = VALID.replace("name = \"MODEL\"\n", "");
        assert_eq!(
            err(&toml),
            ValidationError::MissingField {
                path: "participants.required_roles[0].environment[0].name".into()
            }
        );

        let toml = VALID.replace("default = \"gpt-4\"", "default = [\"gpt-4\"]");
        assert!(matches!(err(&toml), ValidationError::WrongType { expected: "a scalar", .. }));
    }

    #[test]
    fn generated_keys_are_reserved() {
        let toml = VALID.replace("description = \"judge\"", "endpoint = \"http://x\"");
        assert_eq!(
            err(&toml),
            ValidationError::ReservedField {
                path: "green_agent.endpoint".into()
            }
        );

        let toml = VALID.replace("port = 9000", "port = 9000\nrole = \"x\"");
        assert_eq!(
            err(&toml),
            ValidationError::ReservedField {
                path: "participants.required_roles[0].role".into()
            }
        );
    }

    #[test]
    fn non_table_sections_are_type_errors() {
        let toml = "green_agent = \"oops\"\n";
        assert!(matches!(err(toml), ValidationError::WrongType { ref path, .. } if path == "green_agent"));
    }
}
