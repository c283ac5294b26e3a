use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use labels_core::{DEFAULT_PAGE_SIZE, RepoId, fetch_all_pages};
use std::fmt;
use std::time::Duration;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// How requests authenticate
#[derive(Clone)]
pub enum Auth {
    /// Personal access token
    Token(String),
    /// Login and password, sent as HTTP basic auth
    Basic { login: String, password: String },
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => f.write_str("Token(***)"),
            Auth::Basic { login, .. } => write!(f, "Basic({}:***)", login),
        }
    }
}

/// GitHub REST API client.
///
/// One client is one authenticated session; repositories are addressed per call.
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    auth: Auth,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(auth: Auth) -> Self {
        Self::with_base_url(DEFAULT_API_URL, auth)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    ///
    /// Enterprise URLs have the form `https://<host>/api/v3`.
    pub fn with_base_url(base_url: &str, auth: Auth) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, repo: &RepoId, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            path
        )
    }

    /// Build a URL for a single label
    fn label_url(&self, repo: &RepoId, name: &str) -> String {
        self.repo_url(repo, &format!("/labels/{}", urlencoding::encode(name)))
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        match &self.auth {
            Auth::Token(token) => format!("Bearer {}", token),
            Auth::Basic { login, password } => {
                format!("Basic {}", STANDARD.encode(format!("{}:{}", login, password)))
            }
        }
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };

        // Detect rate limiting: 403 with x-ratelimit-remaining: 0
        if status == 403 && header("x-ratelimit-remaining") == "0" {
            return Err(GitHubError::RateLimited);
        }

        // Accounts with 2FA answer basic auth with `X-GitHub-OTP: required; <method>`
        if status == 401 && header("x-github-otp").starts_with("required") {
            return Err(GitHubError::TwoFactorRequired);
        }

        // Try to read error body
        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Try to parse as GitHub error response
        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            error_response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(&body)
                .to_string()
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        match status {
            401 => Err(GitHubError::Unauthorized),
            404 => Err(GitHubError::NotFound(message)),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    // ==================== Repository Operations ====================

    /// Get a specific repository
    pub fn get_repo(&self, repo: &RepoId) -> Result<GitHubRepo> {
        let url = self.repo_url(repo, "");
        tracing::debug!(%url, "GET repository");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = self
            .check_response(response)
            .map_err(|e| e.or_not_found(|| GitHubError::RepositoryNotFound(repo.to_string())))?;
        let found: GitHubRepo = response.body_mut().read_json()?;
        Ok(found)
    }

    // ==================== Label Operations ====================

    /// List one page of labels for the repository
    pub fn list_labels_page(
        &self,
        repo: &RepoId,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<GitHubLabel>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url(repo, "/labels"),
            per_page,
            page
        );
        tracing::debug!(%url, "GET labels");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = self
            .check_response(response)
            .map_err(|e| e.or_not_found(|| GitHubError::RepositoryNotFound(repo.to_string())))?;
        let labels: Vec<GitHubLabel> = response.body_mut().read_json()?;
        Ok(labels)
    }

    /// List every label of the repository, following pagination
    pub fn list_labels(&self, repo: &RepoId) -> Result<Vec<GitHubLabel>> {
        fetch_all_pages(
            |page, per_page| self.list_labels_page(repo, per_page, page),
            DEFAULT_PAGE_SIZE,
        )
    }

    /// Create a label
    pub fn create_label(&self, repo: &RepoId, label: &CreateGitHubLabel) -> Result<GitHubLabel> {
        let url = self.repo_url(repo, "/labels");
        tracing::debug!(%url, name = %label.name, "POST label");

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(label)
            .map_err(GitHubError::Http)?;

        let mut response = self
            .check_response(response)
            .map_err(|e| e.or_not_found(|| GitHubError::RepositoryNotFound(repo.to_string())))?;
        let created: GitHubLabel = response.body_mut().read_json()?;
        Ok(created)
    }

    /// Delete a label by name
    pub fn delete_label(&self, repo: &RepoId, name: &str) -> Result<()> {
        let url = self.label_url(repo, name);
        tracing::debug!(%url, "DELETE label");

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        self.check_response(response)
            .map_err(|e| e.or_not_found(|| GitHubError::LabelNotFound(name.to_string())))?;
        Ok(())
    }

    /// Update a label by name
    pub fn update_label(
        &self,
        repo: &RepoId,
        name: &str,
        update: &UpdateGitHubLabel,
    ) -> Result<GitHubLabel> {
        let url = self.label_url(repo, name);
        tracing::debug!(%url, "PATCH label");

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(update)
            .map_err(GitHubError::Http)?;

        let mut response = self
            .check_response(response)
            .map_err(|e| e.or_not_found(|| GitHubError::LabelNotFound(name.to_string())))?;
        let label: GitHubLabel = response.body_mut().read_json()?;
        Ok(label)
    }
}
