//! Fixture-backed label host for github-labels-copy testing
//!
//! This crate provides a [`MockHost`] implementing `LabelHost` that serves
//! repositories described in a scenario manifest instead of talking to GitHub.
//! Mutations are applied to in-memory state and every call is appended to a
//! call log, so tests can check exactly which remote calls a run issued.
//!
//! # Usage
//!
//! Set the `LABELS_MOCK_DIR` environment variable to point to a scenario directory:
//!
//! ```bash
//! LABELS_MOCK_DIR=./scenario github-labels-copy --token x acme/source acme/dest
//! ```
//!
//! # Scenario Structure
//!
//! ```text
//! scenario/
//! ├── manifest.toml      # Repositories, their labels, injected failures
//! └── call_log.jsonl     # Runtime log (written by MockHost)
//! ```

mod client;
mod manifest;

pub use client::{
    read_call_log, CallLogEntry, MockHost, MockRepository, CALL_LOG_FILE, MANIFEST_FILE,
};
pub use manifest::{ArgMatcher, FailureRule, Manifest, ManifestError};

/// Environment variable to enable mock mode
pub const MOCK_DIR_ENV: &str = "LABELS_MOCK_DIR";

/// Get the mock directory from environment, if set
pub fn get_mock_dir() -> Option<std::path::PathBuf> {
    std::env::var(MOCK_DIR_ENV)
        .ok()
        .map(std::path::PathBuf::from)
}
