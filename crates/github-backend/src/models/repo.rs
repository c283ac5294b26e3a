use serde::{Deserialize, Serialize};

/// Repository owner (user or organization)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubOwner {
    pub login: String,
    pub id: u64,
}

/// GitHub repository
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub owner: GitHubOwner,
}
