//! YAML snapshot codec.
//!
//! A snapshot maps label names to their attributes:
//!
//! ```yaml
//! bug:
//!   color: d73a4a
//!   description: Something isn't working
//! wontfix:
//!   color: ffffff
//! ```

use std::path::Path;

use crate::error::{Result, SyncError};
use crate::models::LabelCollection;

/// Default file written in dump mode
pub const DEFAULT_DUMP_FILE: &str = "labels.yaml";

pub fn dump(labels: &LabelCollection) -> Result<String> {
    Ok(serde_yaml::to_string(labels)?)
}

pub fn load(text: &str) -> Result<LabelCollection> {
    if text.trim().is_empty() {
        return Ok(LabelCollection::new());
    }
    // A bare `~`/`null` document is empty too
    let labels: Option<LabelCollection> = serde_yaml::from_str(text)?;
    Ok(labels.unwrap_or_default())
}

pub fn read_file(path: impl AsRef<Path>) -> Result<LabelCollection> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    load(&text).map_err(|e| match e {
        SyncError::Format(msg) => SyncError::Format(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

pub fn write_file(path: impl AsRef<Path>, labels: &LabelCollection) -> Result<()> {
    let path = path.as_ref();
    let text = dump(labels)?;
    std::fs::write(path, text)
        .map_err(|e| SyncError::Io(format!("Failed to write {}: {}", path.display(), e)))
}
