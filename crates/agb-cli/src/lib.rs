//! # agb-cli: AgentBeats Scenario Command-Line Interface
//!
//! Provides the `agb-compose` binary, which turns a `scenario.toml` into
//! `docker-compose.yml`, `runner-scenario.toml`, and (when the scenario
//! declares environment variables) `.env.example`.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; loading, validation, and generation are
//!   delegated to `agb-scenario`.
//! - Handlers return `anyhow::Result<u8>`; only `main` turns that into a
//!   process exit code.

pub mod generate;

use std::path::{Path, PathBuf};

/// Resolve a path given on the command line against the working directory.
///
/// Absolute paths are returned as-is.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
