use labels_core::{
    Label, LabelAttrs, LabelHost, LabelRepository, RepoId, Result, SyncError,
};

use crate::client::GitHubClient;
use crate::models::{CreateGitHubLabel, UpdateGitHubLabel};

/// A repository opened through a [`GitHubClient`] session
pub struct GitHubRepository<'a> {
    client: &'a GitHubClient,
    id: RepoId,
}

impl<'a> GitHubRepository<'a> {
    /// Open a repository, checking that it exists and is visible
    pub fn open(client: &'a GitHubClient, id: &RepoId) -> Result<Self> {
        let repo = client.get_repo(id).map_err(SyncError::from)?;
        tracing::debug!(full_name = %repo.full_name, "opened repository");

        Ok(Self {
            client,
            id: id.clone(),
        })
    }
}

impl LabelRepository for GitHubRepository<'_> {
    fn id(&self) -> &RepoId {
        &self.id
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        self.client
            .list_labels(&self.id)
            .map(|labels| labels.into_iter().map(Into::into).collect())
            .map_err(SyncError::from)
    }

    fn create_label(&self, name: &str, attrs: &LabelAttrs) -> Result<()> {
        let create = CreateGitHubLabel::new(name, attrs);

        self.client
            .create_label(&self.id, &create)
            .map(|_| ())
            .map_err(SyncError::from)
    }

    fn update_label(&self, name: &str, attrs: &LabelAttrs) -> Result<()> {
        let update = UpdateGitHubLabel::replace(attrs);

        self.client
            .update_label(&self.id, name, &update)
            .map(|_| ())
            .map_err(SyncError::from)
    }

    fn delete_label(&self, name: &str) -> Result<()> {
        self.client
            .delete_label(&self.id, name)
            .map_err(SyncError::from)
    }
}

impl LabelHost for GitHubClient {
    fn open_repo<'a>(&'a self, id: &RepoId) -> Result<Box<dyn LabelRepository + 'a>> {
        Ok(Box::new(GitHubRepository::open(self, id)?))
    }
}
