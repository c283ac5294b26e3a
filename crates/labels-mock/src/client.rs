//! Mock host implementing the LabelHost and LabelRepository traits
//!
//! Serves repositories from a manifest and applies mutations in memory.

use crate::manifest::Manifest;
use chrono::{DateTime, Utc};
use labels_core::{
    Label, LabelAttrs, LabelCollection, LabelHost, LabelRepository, RepoId, Result, SyncError,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Manifest file name inside a scenario directory
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Call log file name inside a scenario directory
pub const CALL_LOG_FILE: &str = "call_log.jsonl";

/// A mock host that serves repositories declared in a scenario manifest
pub struct MockHost {
    /// Root directory containing the scenario
    scenario_dir: PathBuf,

    /// The loaded manifest
    manifest: Manifest,

    /// Current labels per repository, mutated by create/update/delete
    state: Mutex<BTreeMap<String, LabelCollection>>,

    /// Number of calls served so far
    calls: Mutex<usize>,

    /// Call log file writer; `None` when logging is disabled
    log_writer: Mutex<Option<BufWriter<File>>>,
}

/// A single call log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,

    /// Method name
    pub method: String,

    /// Arguments passed
    pub args: HashMap<String, serde_json::Value>,

    /// Error message (if call failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Response status code
    pub status: u16,

    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl CallLogEntry {
    /// Whether the call would have changed the remote repository
    pub fn is_mutation(&self) -> bool {
        matches!(
            self.method.as_str(),
            "create_label" | "update_label" | "delete_label"
        )
    }

    /// String value of an argument
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}

impl MockHost {
    /// Create a new MockHost from a scenario directory
    pub fn new(scenario_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(scenario_dir.as_ref(), true)
    }

    /// Create a MockHost that never writes a call log (for testing)
    pub fn new_without_logging(scenario_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(scenario_dir.as_ref(), false)
    }

    fn open(scenario_dir: &Path, log_enabled: bool) -> Result<Self> {
        let manifest_path = scenario_dir.join(MANIFEST_FILE);
        let manifest = Manifest::load(&manifest_path)
            .map_err(|e| SyncError::Io(format!("Failed to load mock manifest: {}", e)))?;

        let log_writer = if log_enabled {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(scenario_dir.join(CALL_LOG_FILE))
                .ok()
                .map(BufWriter::new)
        } else {
            None
        };

        Ok(Self {
            scenario_dir: scenario_dir.to_path_buf(),
            state: Mutex::new(manifest.repos.clone()),
            manifest,
            calls: Mutex::new(0),
            log_writer: Mutex::new(log_writer),
        })
    }

    /// Current labels of a repository, including mutations applied so far
    pub fn labels(&self, repo: &RepoId) -> Option<LabelCollection> {
        lock(&self.state).get(&repo.to_string()).cloned()
    }

    /// Get the call log entries
    pub fn read_call_log(&self) -> Result<Vec<CallLogEntry>> {
        read_call_log(&self.scenario_dir)
    }

    /// Clear the call log
    pub fn clear_call_log(&self) -> Result<()> {
        let log_path = self.scenario_dir.join(CALL_LOG_FILE);
        std::fs::write(&log_path, "")
            .map_err(|e| SyncError::Io(format!("Failed to clear call log: {}", e)))
    }

    /// Get total number of calls made
    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }

    /// Serve one call: apply an injected failure if one matches, otherwise run `op`
    fn serve<T>(
        &self,
        method: &str,
        args: HashMap<String, String>,
        op: impl FnOnce(&mut BTreeMap<String, LabelCollection>) -> Result<T>,
    ) -> Result<T> {
        let start = std::time::Instant::now();
        *lock(&self.calls) += 1;

        let result = match self.manifest.find_failure(method, &args) {
            Some(rule) => {
                let message = rule
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("HTTP {}", rule.status));
                Err(error_for_status(method, &args, rule.status, message))
            }
            None => op(&mut lock(&self.state)),
        };

        let (status, error) = match &result {
            Ok(_) => (success_status(method), None),
            Err(e) => (status_of(e), Some(e.to_string())),
        };
        self.log_call(method, &args, error.as_deref(), status, start);

        result
    }

    /// Log a call to the call log file
    fn log_call(
        &self,
        method: &str,
        args: &HashMap<String, String>,
        error: Option<&str>,
        status: u16,
        start: std::time::Instant,
    ) {
        let entry = CallLogEntry {
            timestamp: Utc::now(),
            method: method.to_string(),
            args: args
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
            error: error.map(String::from),
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if let Some(w) = lock(&self.log_writer).as_mut() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }
}

/// Read the call log of a scenario directory
pub fn read_call_log(scenario_dir: &Path) -> Result<Vec<CallLogEntry>> {
    let log_path = scenario_dir.join(CALL_LOG_FILE);
    let content = std::fs::read_to_string(&log_path).unwrap_or_default();

    let entries: Vec<CallLogEntry> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    Ok(entries)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Translate a simulated HTTP status into the error GitHub would have produced
fn error_for_status(
    method: &str,
    args: &HashMap<String, String>,
    status: u16,
    message: String,
) -> SyncError {
    let arg = |key: &str| args.get(key).cloned().unwrap_or_default();

    match status {
        0 => SyncError::Transient(message),
        401 => SyncError::Unauthorized,
        404 => match method {
            "update_label" | "delete_label" => SyncError::LabelNotFound(arg("name")),
            _ => SyncError::RepositoryNotFound(arg("repo")),
        },
        429 => SyncError::RateLimited,
        _ => SyncError::Api { status, message },
    }
}

fn status_of(err: &SyncError) -> u16 {
    match err {
        SyncError::Transient(_) => 0,
        SyncError::Unauthorized | SyncError::TwoFactorRequired => 401,
        SyncError::RepositoryNotFound(_) | SyncError::LabelNotFound(_) => 404,
        SyncError::RateLimited => 429,
        SyncError::Api { status, .. } => *status,
        _ => 500,
    }
}

fn success_status(method: &str) -> u16 {
    match method {
        "create_label" => 201,
        "delete_label" => 204,
        _ => 200,
    }
}

fn repo_args(repo: &RepoId) -> HashMap<String, String> {
    [("repo".to_string(), repo.to_string())].into_iter().collect()
}

fn label_args(repo: &RepoId, name: &str, attrs: Option<&LabelAttrs>) -> HashMap<String, String> {
    let mut args = repo_args(repo);
    args.insert("name".to_string(), name.to_string());
    if let Some(attrs) = attrs {
        args.insert("color".to_string(), attrs.color().to_string());
        if let Some(description) = attrs.description() {
            args.insert("description".to_string(), description.to_string());
        }
    }
    args
}

fn repo_labels<'s>(
    state: &'s mut BTreeMap<String, LabelCollection>,
    repo: &RepoId,
) -> Result<&'s mut LabelCollection> {
    state
        .get_mut(&repo.to_string())
        .ok_or_else(|| SyncError::RepositoryNotFound(repo.to_string()))
}

/// A repository served by a [`MockHost`]
pub struct MockRepository<'a> {
    host: &'a MockHost,
    id: RepoId,
}

impl LabelHost for MockHost {
    fn open_repo<'a>(&'a self, id: &RepoId) -> Result<Box<dyn LabelRepository + 'a>> {
        self.serve("open_repo", repo_args(id), |state| {
            repo_labels(state, id).map(|_| ())
        })?;

        Ok(Box::new(MockRepository {
            host: self,
            id: id.clone(),
        }))
    }
}

impl LabelRepository for MockRepository<'_> {
    fn id(&self) -> &RepoId {
        &self.id
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        self.host
            .serve("list_labels", repo_args(&self.id), |state| {
                let labels = repo_labels(state, &self.id)?;
                Ok(labels
                    .iter()
                    .map(|(name, attrs)| Label::new(name.clone(), attrs.clone()))
                    .collect())
            })
    }

    fn create_label(&self, name: &str, attrs: &LabelAttrs) -> Result<()> {
        let args = label_args(&self.id, name, Some(attrs));
        self.host.serve("create_label", args, |state| {
            let labels = repo_labels(state, &self.id)?;
            if labels.contains(name) {
                return Err(SyncError::Api {
                    status: 422,
                    message: "Validation Failed".to_string(),
                });
            }
            labels.insert(name, attrs.clone());
            Ok(())
        })
    }

    fn update_label(&self, name: &str, attrs: &LabelAttrs) -> Result<()> {
        let args = label_args(&self.id, name, Some(attrs));
        self.host.serve("update_label", args, |state| {
            let labels = repo_labels(state, &self.id)?;
            if !labels.contains(name) {
                return Err(SyncError::LabelNotFound(name.to_string()));
            }
            labels.insert(name, attrs.clone());
            Ok(())
        })
    }

    fn delete_label(&self, name: &str) -> Result<()> {
        let args = label_args(&self.id, name, None);
        self.host.serve("delete_label", args, |state| {
            repo_labels(state, &self.id)?
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| SyncError::LabelNotFound(name.to_string()))
        })
    }
}
