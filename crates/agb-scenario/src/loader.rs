//! # Scenario Loader
//!
//! Reads a `scenario.toml` from disk into a [`Document`]. The document is
//! read-only after load; validation and every generator borrow it.

use std::path::Path;

use crate::error::{ScenarioError, ScenarioResult};
use crate::value::{mapping_from_table, Mapping, Value};

/// Root mapping of a parsed scenario file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    /// Parse a document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Parse`] with the underlying TOML diagnostic
    /// if the text is not valid TOML.
    pub fn from_toml_str(content: &str) -> ScenarioResult<Self> {
        let table = content.parse::<toml::Table>()?;
        Ok(Self {
            root: mapping_from_table(table),
        })
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Top-level entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Load and parse a scenario file.
///
/// # Errors
///
/// - [`ScenarioError::NotFound`] if `path` does not exist.
/// - [`ScenarioError::Read`] if it cannot be read.
/// - [`ScenarioError::Parse`] if it is not valid TOML.
pub fn load(path: &Path) -> ScenarioResult<Document> {
    if !path.exists() {
        return Err(ScenarioError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = Document::from_toml_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        sections = document.root.len(),
        "loaded scenario document"
    );
    Ok(document)
}
