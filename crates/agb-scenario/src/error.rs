//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Nothing in this crate terminates the process; the CLI
//! decides the exit status.
//!
//! Validation messages name the exact field path, including the sequence
//! index for role-level checks (e.g. `participants.required_roles[1].port`).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for loading, validating, and writing scenarios.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The scenario file does not exist.
    #[error("TOML file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The scenario file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not syntactically valid TOML.
    #[error("error parsing TOML file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required field is missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The compose settings file could not be read or parsed.
    #[error("invalid settings file {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },

    /// An output artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Structural problem found in a loaded scenario document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("required field '{path}' not found in TOML")]
    MissingField {
        /// Dotted field path, e.g. `green_agent.port`.
        path: String,
    },

    /// `participants.required_roles` is absent or empty.
    #[error("at least one participant role is required")]
    NoParticipants,

    /// A field is present but has the wrong type.
    #[error("field '{path}' must be {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A port is outside the TCP port range.
    #[error("field '{path}' must be a port between 1 and 65535, found {value}")]
    PortOutOfRange { path: String, value: i64 },

    /// A service or environment variable name cannot be used as-is.
    #[error("field '{path}' has invalid name '{name}': {reason}")]
    InvalidName {
        path: String,
        name: String,
        reason: &'static str,
    },

    /// Two roles share the same name and would collide as services.
    #[error(
        "duplicate participant role '{name}' at participants.required_roles[{first}] \
         and participants.required_roles[{second}]"
    )]
    DuplicateRole {
        name: String,
        first: usize,
        second: usize,
    },

    /// A field that the runner scenario generates itself.
    #[error("field '{path}' is reserved: it is generated in the runner scenario")]
    ReservedField { path: String },
}

/// Convenience alias used throughout the crate.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
