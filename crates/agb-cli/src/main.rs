//! # agb-compose CLI entry point
//!
//! Parses command-line arguments, initialises tracing, and runs the
//! generate handler. The only place that decides the process exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agb_cli::generate::{run_generate, GenerateArgs};

/// Generate Docker Compose configuration from an AgentBeats scenario.
///
/// Reads a scenario.toml describing a green agent and its participant roles
/// and writes docker-compose.yml, runner-scenario.toml, and .env.example.
#[derive(Parser, Debug)]
#[command(name = "agb-compose", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    generate: GenerateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("agb-compose v{} starting", env!("CARGO_PKG_VERSION"));

    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        tracing::warn!("could not read current directory ({e}); using '.'");
        PathBuf::from(".")
    });

    match run_generate(&cli.generate, &cwd) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
