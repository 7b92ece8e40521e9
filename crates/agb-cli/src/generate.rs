//! # Generate Command
//!
//! Loads a scenario, validates it, and writes the deployment artifacts.
//!
//! ## Usage
//!
//! ```bash
//! # Write docker-compose.yml, runner-scenario.toml (and .env.example) here:
//! agb-compose scenarios/debate/scenario.toml
//!
//! # Write into another directory, created if missing:
//! agb-compose scenario.toml --output-dir deploy/
//!
//! # Print the artifacts without writing anything:
//! agb-compose scenario.toml --dry-run
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use agb_scenario::artifacts::write_artifact;
use agb_scenario::{
    load, validate, ArtifactSet, ComposeSettings, COMPOSE_FILE, ENV_EXAMPLE_FILE,
};

use crate::resolve_path;

/// Arguments for generating deployment artifacts.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the scenario.toml file.
    pub scenario: PathBuf,

    /// Directory to write output files into. Defaults to the current directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// YAML file overriding compose settings (runner image, network, health checks).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Runner image to use instead of the configured one.
    #[arg(long)]
    pub runner_image: Option<String>,

    /// Print the generated files to stdout without writing them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the generate command.
///
/// Relative paths in `args` are resolved against `cwd`. Nothing is written
/// (not even the output directory) unless loading and validation succeed.
pub fn run_generate(args: &GenerateArgs, cwd: &Path) -> Result<u8> {
    let scenario_path = resolve_path(&args.scenario, cwd);
    let output_dir = args
        .output_dir
        .as_deref()
        .map(|dir| resolve_path(dir, cwd))
        .unwrap_or_else(|| cwd.to_path_buf());

    let settings = load_settings(args, cwd)?;

    println!("Reading configuration from {}", scenario_path.display());
    let document = load(&scenario_path)?;
    let scenario = validate(&document)
        .with_context(|| format!("validating {}", scenario_path.display()))?;

    tracing::info!(
        roles = scenario.roles.len(),
        services = ?scenario.service_names(),
        "scenario validated"
    );

    let artifacts = ArtifactSet::generate(&scenario, &settings);

    if args.dry_run {
        for (file_name, contents) in artifacts.iter() {
            println!("# ---- {file_name} ----");
            print!("{contents}");
        }
        println!("(dry-run: no files written)");
        return Ok(0);
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory: {}", output_dir.display()))?;

    let mut written = Vec::new();
    for (file_name, contents) in artifacts.iter() {
        println!("Writing {}", output_dir.join(file_name).display());
        written.push(write_artifact(&output_dir, file_name, contents)?);
    }

    print_summary(&written, artifacts.has_env_example());
    Ok(0)
}

fn load_settings(args: &GenerateArgs, cwd: &Path) -> Result<ComposeSettings> {
    let mut settings = match &args.config {
        Some(path) => ComposeSettings::from_yaml_file(&resolve_path(path, cwd))?,
        None => ComposeSettings::default(),
    };
    if let Some(image) = &args.runner_image {
        tracing::debug!(image = %image, "overriding runner image");
        settings.runner_image = image.clone();
    }
    Ok(settings)
}

fn print_summary(written: &[PathBuf], has_env_example: bool) {
    println!();
    println!("Success! Generated files:");
    for path in written {
        println!("  - {}", path.display());
    }
    println!();
    println!("Next steps:");
    println!("  1. Review the generated {COMPOSE_FILE}");
    if has_env_example {
        println!("  2. Copy {ENV_EXAMPLE_FILE} to .env and fill in required values");
        println!("  3. Run: docker-compose up");
    } else {
        println!("  2. Run: docker-compose up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(scenario: &str) -> GenerateArgs {
        GenerateArgs {
            scenario: PathBuf::from(scenario),
            output_dir: None,
            config: None,
            runner_image: None,
            dry_run: false,
        }
    }

    #[test]
    fn runner_image_flag_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.yaml"),
            "runner_image: from-file:1\nnetwork_name: arena\n",
        )
        .unwrap();

        let mut a = args("scenario.toml");
        a.config = Some(PathBuf::from("settings.yaml"));
        let settings = load_settings(&a, dir.path()).unwrap();
        assert_eq!(settings.runner_image, "from-file:1");
        assert_eq!(settings.network_name, "arena");

        a.runner_image = Some("from-flag:2".into());
        let settings = load_settings(&a, dir.path()).unwrap();
        assert_eq!(settings.runner_image, "from-flag:2");
        assert_eq!(settings.network_name, "arena");
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args("scenario.toml");
        a.config = Some(PathBuf::from("absent.yaml"));
        assert!(load_settings(&a, dir.path()).is_err());
    }

    #[test]
    fn defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&args("scenario.toml"), dir.path()).unwrap();
        assert_eq!(settings, ComposeSettings::default());
    }
}
