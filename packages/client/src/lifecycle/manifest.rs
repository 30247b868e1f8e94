//! Revision manifest produced by the asset pipeline
//!
//! The build step renames assets to content-hashed names and writes a JSON
//! object mapping each logical path to its revisioned path, e.g.
//! `{"js/main.min.js": "js/main.min-1a2b3c4d.js"}`. Seed paths are rewritten
//! through it so the store holds exactly what pages will request.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigResult;

/// Logical asset path to revisioned asset path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionManifest {
    entries: BTreeMap<String, String>,
}

impl RevisionManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON manifest
    ///
    /// # Errors
    ///
    /// `ConfigurationError::Parse` if the document is not a string map.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON manifest file
    ///
    /// # Errors
    ///
    /// `ConfigurationError::Io` or `ConfigurationError::Parse`.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Record a mapping; leading slashes are ignored on both sides
    pub fn insert(&mut self, logical: &str, revisioned: &str) {
        self.entries.insert(
            logical.trim_start_matches('/').to_string(),
            revisioned.trim_start_matches('/').to_string(),
        );
    }

    /// Revisioned form of an origin-relative path, or the path unchanged
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        match self.entries.get(path.trim_start_matches('/')) {
            Some(revisioned) => format!("/{revisioned}"),
            None => path.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_known_paths_only() {
        let manifest = RevisionManifest::from_json_str(
            r#"{"js/main.min.js": "js/main.min-1a2b3c4d.js", "css/app-shell.min.css": "css/app-shell.min-99aa00bb.css"}"#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.resolve("/js/main.min.js"), "/js/main.min-1a2b3c4d.js");
        assert_eq!(manifest.resolve("/index.html"), "/index.html");
    }

    #[test]
    fn insert_normalizes_slashes() {
        let mut manifest = RevisionManifest::new();
        manifest.insert("/css/app.css", "/css/app-0011.css");
        assert_eq!(manifest.resolve("css/app.css"), "/css/app-0011.css");
    }
}
