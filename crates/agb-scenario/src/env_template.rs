//! # `.env.example` Generation
//!
//! Lists every environment variable the scenario declares, split into
//! required variables (no default: the operator must fill them in) and
//! optional ones (documented only, since their defaults are already in
//! `docker-compose.yml`). Order follows the green agent, then roles in
//! document order, then declaration order within each agent.

use crate::scenario::{EnvVar, Scenario};

/// Generate the `.env.example` contents.
///
/// Returns `None` when no agent declares any environment variable; the
/// caller then writes no file at all.
pub fn generate_env_example(scenario: &Scenario<'_>) -> Option<String> {
    if !scenario.has_environment() {
        return None;
    }

    let mut required: Vec<(&str, &EnvVar<'_>)> = Vec::new();
    let mut optional: Vec<(&str, &EnvVar<'_>)> = Vec::new();
    for agent in scenario.agents() {
        for var in &agent.environment {
            if var.is_required() {
                required.push((agent.service, var));
            } else {
                optional.push((agent.service, var));
            }
        }
    }

    let mut out = String::new();
    out.push_str("# Environment variables for agents\n");
    out.push_str("# Copy this file to .env and fill in the required values\n");
    out.push('\n');

    if !required.is_empty() {
        out.push_str("# Required variables (no defaults)\n");
        for (owner, var) in &required {
            out.push_str(&format!("# {owner}\n"));
            out.push_str(&format!("{}=\n", var.name));
        }
    }

    if !optional.is_empty() {
        if !required.is_empty() {
            out.push('\n');
        }
        out.push_str("# Optional variables (defaults are set in docker-compose.yml)\n");
        for (owner, var) in &optional {
            let default = var.default_text().unwrap_or_default();
            out.push_str(&format!(
                "# {owner}: {}={}\n",
                var.name,
                single_line(&default)
            ));
        }
    }

    tracing::debug!(
        required = required.len(),
        optional = optional.len(),
        "rendered env template"
    );
    Some(out)
}

/// Keep a multi-line default on its comment line.
fn single_line(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Document;
    use crate::validate::validate;

    fn env_for(toml: &str) -> Option<String> {
        let document = Document::from_toml_str(toml).unwrap();
        let scenario = validate(&document).unwrap();
        generate_env_example(&scenario)
    }

    const WITH_ENV: &str = r#"
[green_agent]
image = "g"
port = 8080

[[green_agent.environment]]
name = "JUDGE_KEY"

[[green_agent.environment]]
name = "LOG_LEVEL"
default = "info"

[[participants.required_roles]]
name = "pro"
image = "p"
port = 9000

[[participants.required_roles.environment]]
name = "OPENAI_API_KEY"

[[participants.required_roles]]
name = "con"
image = "c"
port = 9001

[[participants.required_roles.environment]]
name = "MAX_TOKENS"
default = 512

[[participants.required_roles.environment]]
name = "ANTHROPIC_API_KEY"
"#;

    #[test]
    fn renders_required_then_optional_sections() {
        let expected = "\
# Environment variables for agents
# Copy this file to .env and fill in the required values

# Required variables (no defaults)
# green-agent
JUDGE_KEY=
# pro
OPENAI_API_KEY=
# con
ANTHROPIC_API_KEY=

# Optional variables (defaults are set in docker-compose.yml)
# green-agent: LOG_LEVEL=info
# con: MAX_TOKENS=512
";
        assert_eq!(env_for(WITH_ENV).unwrap(), expected);
    }

    #[test]
    fn only_required_section_when_no_defaults() {
        let toml = r#"
[green_agent]
image = "g"
port = 8080

[[participants.required_roles]]
name = "pro"
image = "p"
port = 9000

[[participants.required_roles.environment]]
name = "KEY"
"#;
        let env = env_for(toml).unwrap();
        assert!(env.contains("# pro\nKEY=\n"));
        assert!(!env.contains("Optional variables"));
    }

    #[test]
    fn only_optional_section_when_all_defaulted() {
        let toml = r#"
[green_agent]
image = "g"
port = 8080

[[green_agent.environment]]
name = "LOG_LEVEL"
default = "info"

[[participants.required_roles]]
name = "pro"
image = "p"
port = 9000
"#;
        let expected = "\
# Environment variables for agents
# Copy this file to .env and fill in the required values

# Optional variables (defaults are set in docker-compose.yml)
# green-agent: LOG_LEVEL=info
";
        assert_eq!(env_for(toml).unwrap(), expected);
    }

    #[test]
    fn line_breaks_in_defaults_stay_on_the_comment_line() {
        let toml = r#"
[green_agent]
image = "g"
port = 8080

[[green_agent.environment]]
name = "BANNER"
default = "one\r\ntwo\rthree"

[[participants.required_roles]]
name = "pro"
image = "p"
port = 9000
"#;
        let env = env_for(toml).unwrap();
        assert!(env.ends_with("# green-agent: BANNER=one\\r\\ntwo\\rthree\n"));
        assert!(!env.contains('\r'));
        assert_eq!(env.lines().last(), Some("# green-agent: BANNER=one\\r\\ntwo\\rthree"));
    }

    #[test]
    fn no_environment_means_no_file() {
        let toml = r#"
[green_agent]
image = "g"
port = 8080

[[participants.required_roles]]
name = "pro"
image = "p"
port = 9000
"#;
        assert!(env_for(toml).is_none());
    }

    #[test]
    fn empty_environment_arrays_mean_no_file() {
        let toml = r#"
[green_agent]
image = "g"
port = 8080
environment = []

[[participants.required_roles]]
name = "pro"
image = "p"
port = 9000
environment = []
"#;
        assert!(env_for(toml).is_none());
    }
}
