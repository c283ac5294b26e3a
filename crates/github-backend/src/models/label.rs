use labels_core::{Label, LabelAttrs};
use serde::{Deserialize, Serialize};

/// GitHub label
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubLabel {
    pub id: u64,
    pub name: String,
    /// Color hex string WITHOUT `#` prefix (e.g., "fc2929")
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<GitHubLabel> for Label {
    fn from(l: GitHubLabel) -> Self {
        Label::new(l.name, LabelAttrs::new(&l.color, l.description))
    }
}

/// Create a new GitHub label
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubLabel {
    pub name: String,
    /// Color hex string WITHOUT `#` prefix (e.g., "fc2929")
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateGitHubLabel {
    pub fn new(name: &str, attrs: &LabelAttrs) -> Self {
        Self {
            name: name.to_string(),
            color: attrs.color().to_string(),
            description: attrs.description().map(String::from),
        }
    }
}

/// Update a GitHub label
#[derive(Debug, Clone, Serialize)]
pub struct UpdateGitHubLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateGitHubLabel {
    /// Replace color and description, keeping the name.
    ///
    /// An absent description is sent as `""` so GitHub clears it.
    pub fn replace(attrs: &LabelAttrs) -> Self {
        Self {
            new_name: None,
            color: Some(attrs.color().to_string()),
            description: Some(attrs.description().unwrap_or_default().to_string()),
        }
    }
}
