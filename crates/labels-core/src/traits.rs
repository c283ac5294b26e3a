use crate::error::Result;
use crate::models::*;

/// Label operations on a single remote repository
///
/// Each backend (GitHub, the fixture mock) provides its own implementation.
/// Labels are addressed by name, which is also the handle used for edits and
/// deletions.
pub trait LabelRepository {
    /// Identifier this handle was opened with
    fn id(&self) -> &RepoId;

    /// List every label of the repository (all pages)
    fn list_labels(&self) -> Result<Vec<Label>>;

    /// Create a label
    fn create_label(&self, name: &str, attrs: &LabelAttrs) -> Result<()>;

    /// Replace color and description of an existing label
    fn update_label(&self, name: &str, attrs: &LabelAttrs) -> Result<()>;

    /// Delete a label by name
    fn delete_label(&self, name: &str) -> Result<()>;
}

/// An authenticated session able to open repositories
pub trait LabelHost {
    /// Resolve a repository, failing with `RepositoryNotFound` when it does not
    /// exist or is not visible with the current credentials
    fn open_repo<'a>(&'a self, id: &RepoId) -> Result<Box<dyn LabelRepository + 'a>>;
}

impl LabelCollection {
    /// Fetch the current labels of a remote repository
    pub fn from_remote(repo: &dyn LabelRepository) -> Result<Self> {
        let labels = repo.list_labels()?;
        tracing::debug!(repo = %repo.id(), count = labels.len(), "fetched labels");
        Ok(labels.into_iter().collect())
    }

    /// Load a collection from a snapshot file written by dump mode
    pub fn from_snapshot(path: impl AsRef<std::path::Path>) -> Result<Self> {
        crate::snapshot::read_file(path)
    }
}
