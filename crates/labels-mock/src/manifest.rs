//! Manifest parsing and failure matching
//!
//! The manifest declares the repositories a scenario serves and the calls that
//! should fail.

use labels_core::LabelCollection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A manifest describes the remote side of a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Labels per repository, keyed by `owner/name`
    #[serde(default)]
    pub repos: BTreeMap<String, LabelCollection>,

    /// Calls answered with an error instead of being applied
    #[serde(default)]
    pub failures: Vec<FailureRule>,
}

/// Makes matching calls fail with the given status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRule {
    /// The repository method name (e.g., "list_labels", "delete_label")
    pub method: String,

    /// Arguments to match (`repo`, `name`; supports wildcards with "*")
    #[serde(default)]
    pub args: HashMap<String, ArgMatcher>,

    /// HTTP status code to simulate; 0 simulates a dropped connection
    pub status: u16,

    /// Error message returned with the status
    #[serde(default)]
    pub message: Option<String>,
}

/// Expected argument value; `"*"` matches anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgMatcher(pub String);

impl ArgMatcher {
    /// Check if this matcher matches the given value
    pub fn matches(&self, value: &str) -> bool {
        self.0 == "*" || self.0 == value
    }
}

impl Manifest {
    /// Load a manifest from a TOML file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::Io(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| ManifestError::Parse(path.to_path_buf(), e))
    }

    /// Find the first failure rule matching a call
    pub fn find_failure(
        &self,
        method: &str,
        args: &HashMap<String, String>,
    ) -> Option<&FailureRule> {
        self.failures.iter().find(|rule| {
            rule.method == method
                && rule
                    .args
                    .iter()
                    .all(|(key, matcher)| args.get(key).is_some_and(|v| matcher.matches(v)))
        })
    }
}

/// Errors that can occur when loading a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file {0}: {1}")]
    Io(std::path::PathBuf, std::io::Error),

    #[error("Failed to parse manifest {0}: {1}")]
    Parse(std::path::PathBuf, toml::de::Error),
}
