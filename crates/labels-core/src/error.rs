use thiserror::Error;

/// Errors surfaced by label collections, the executor and every backend
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Bad credentials")]
    Unauthorized,

    #[error("Two factor authentication required")]
    TwoFactorRequired,

    #[error("Missing credentials. Use --token, --login or set GITHUB_API_TOKEN")]
    NoCredential,

    #[error("Repository not found: {0}. Check your credentials.")]
    RepositoryNotFound(String),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Connection error: {0}")]
    Transient(String),

    #[error("Rate limited by the remote API")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("Malformed snapshot: {0}")]
    Format(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::Format(err.to_string())
    }
}
