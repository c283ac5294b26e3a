use labels_core::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Two factor authentication required")]
    TwoFactorRequired,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl GitHubError {
    /// Give a bare 404 a meaning specific to the call that produced it
    pub(crate) fn or_not_found(self, not_found: impl FnOnce() -> GitHubError) -> GitHubError {
        match self {
            GitHubError::NotFound(_) => not_found(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for SyncError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(ureq::Error::Json(e)) => SyncError::Parse(e.to_string()),
            GitHubError::Http(e) => SyncError::Transient(e.to_string()),
            GitHubError::Parse(e) => SyncError::Parse(e.to_string()),
            GitHubError::RepositoryNotFound(repo) => SyncError::RepositoryNotFound(repo),
            GitHubError::LabelNotFound(name) => SyncError::LabelNotFound(name),
            GitHubError::NotFound(message) => SyncError::Api {
                status: 404,
                message,
            },
            GitHubError::Unauthorized => SyncError::Unauthorized,
            GitHubError::TwoFactorRequired => SyncError::TwoFactorRequired,
            GitHubError::RateLimited => SyncError::RateLimited,
            GitHubError::Api { status, message } => SyncError::Api { status, message },
        }
    }
}
