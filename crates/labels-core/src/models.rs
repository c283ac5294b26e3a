use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

/// Color and description of a label; the part compared during reconciliation.
///
/// Colors are stored lower-case without a `#` prefix (e.g. `"d73a4a"`), and an
/// empty description is stored as `None`, so two attribute sets that GitHub
/// treats as identical also compare equal here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLabelAttrs")]
pub struct LabelAttrs {
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl LabelAttrs {
    pub fn new(color: impl AsRef<str>, description: Option<impl Into<String>>) -> Self {
        let color = color.as_ref().trim().trim_start_matches('#').to_ascii_lowercase();
        let description = description
            .map(Into::into)
            .filter(|d: &String| !d.is_empty());
        Self { color, description }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Snapshot form of [`LabelAttrs`], validated on the way in
#[derive(Deserialize)]
struct RawLabelAttrs {
    color: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawLabelAttrs> for LabelAttrs {
    type Error = String;

    fn try_from(raw: RawLabelAttrs) -> Result<Self, Self::Error> {
        let attrs = LabelAttrs::new(&raw.color, raw.description);
        if !is_hex_color(attrs.color()) {
            return Err(format!(
                "invalid color '{}': expected six hex digits",
                raw.color
            ));
        }
        Ok(attrs)
    }
}

/// Check for a six digit hex color without `#`
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}

/// A named label as listed by a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub name: String,
    #[serde(flatten)]
    pub attrs: LabelAttrs,
}

impl Label {
    pub fn new(name: impl Into<String>, attrs: LabelAttrs) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }
}

/// Mapping from label name to attributes.
///
/// Names are unique; inserting an existing name replaces its attributes.
/// Iteration follows name order, which keeps dumps and reports reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCollection {
    labels: BTreeMap<String, LabelAttrs>,
}

impl LabelCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, attrs: LabelAttrs) -> Option<LabelAttrs> {
        self.labels.insert(name.into(), attrs)
    }

    pub fn remove(&mut self, name: &str) -> Option<LabelAttrs> {
        self.labels.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&LabelAttrs> {
        self.labels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, LabelAttrs> {
        self.labels.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }
}

impl FromIterator<(String, LabelAttrs)> for LabelCollection {
    fn from_iter<I: IntoIterator<Item = (String, LabelAttrs)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Label> for LabelCollection {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        iter.into_iter().map(|l| (l.name, l.attrs)).collect()
    }
}

impl Extend<(String, LabelAttrs)> for LabelCollection {
    fn extend<I: IntoIterator<Item = (String, LabelAttrs)>>(&mut self, iter: I) {
        self.labels.extend(iter);
    }
}

impl IntoIterator for LabelCollection {
    type Item = (String, LabelAttrs);
    type IntoIter = btree_map::IntoIter<String, LabelAttrs>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.into_iter()
    }
}

impl<'a> IntoIterator for &'a LabelCollection {
    type Item = (&'a String, &'a LabelAttrs);
    type IntoIter = btree_map::Iter<'a, String, LabelAttrs>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// What the executor did (or would do) with a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ChangeAction::Create => "create",
            ChangeAction::Update => "update",
            ChangeAction::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// One processed label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelChange {
    pub action: ChangeAction,
    pub name: String,
    #[serde(flatten)]
    pub attrs: LabelAttrs,
}

/// Every label processed during a run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: Vec<LabelChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: ChangeAction, name: &str, attrs: &LabelAttrs) {
        self.changes.push(LabelChange {
            action,
            name: name.to_string(),
            attrs: attrs.clone(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn count(&self, action: ChangeAction) -> usize {
        self.changes.iter().filter(|c| c.action == action).count()
    }

    /// Name to attributes view of the processed labels, as written by dump mode
    pub fn to_collection(&self) -> LabelCollection {
        self.changes
            .iter()
            .map(|c| (c.name.clone(), c.attrs.clone()))
            .collect()
    }
}

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoId {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(SyncError::InvalidInput(format!(
                "repository must be of the form owner/repository, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs_normalize_color_and_empty_description() {
        let a = LabelAttrs::new("#D73A4A", Some(""));
        assert_eq!(a.color(), "d73a4a");
        assert_eq!(a.description(), None);
        assert_eq!(a, LabelAttrs::new("d73a4a", None::<String>));
    }

    #[test]
    fn attrs_differ_on_description() {
        let a = LabelAttrs::new("d73a4a", Some("broken"));
        let b = LabelAttrs::new("d73a4a", None::<String>);
        assert_ne!(a, b);
    }

    #[test]
    fn collection_insert_is_last_write_wins() {
        let collection: LabelCollection = vec![
            Label::new("bug", LabelAttrs::new("111111", None::<String>)),
            Label::new("bug", LabelAttrs::new("222222", None::<String>)),
        ]
        .into_iter()
        .collect();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("bug").unwrap().color(), "222222");
    }

    #[test]
    fn collection_iterates_in_name_order() {
        let mut collection = LabelCollection::new();
        collection.insert("wontfix", LabelAttrs::new("ffffff", None::<String>));
        collection.insert("bug", LabelAttrs::new("d73a4a", None::<String>));
        collection.insert("enhancement", LabelAttrs::new("a2eeef", None::<String>));

        let names: Vec<&str> = collection.names().collect();
        assert_eq!(names, vec!["bug", "enhancement", "wontfix"]);
    }

    #[test]
    fn change_set_counts_and_projection() {
        let mut changes = ChangeSet::new();
        let attrs = LabelAttrs::new("d73a4a", None::<String>);
        changes.record(ChangeAction::Create, "bug", &attrs);
        changes.record(ChangeAction::Delete, "stale", &attrs);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes.count(ChangeAction::Create), 1);
        assert_eq!(changes.count(ChangeAction::Update), 0);

        let collection = changes.to_collection();
        assert!(collection.contains("bug"));
        assert!(collection.contains("stale"));
    }

    #[test]
    fn repo_id_parses_owner_and_name() {
        let id: RepoId = "octocat/hello-world".parse().unwrap();
        assert_eq!(id.owner, "octocat");
        assert_eq!(id.name, "hello-world");
        assert_eq!(id.to_string(), "octocat/hello-world");
    }

    #[test]
    fn repo_id_rejects_malformed_input() {
        for input in ["hello-world", "/repo", "owner/", "a/b/c", ""] {
            let err = input.parse::<RepoId>().unwrap_err();
            assert!(matches!(err, SyncError::InvalidInput(_)), "{input}");
        }
    }

    #[test]
    fn hex_color_check() {
        assert!(is_hex_color("d73a4a"));
        assert!(!is_hex_color("d73a4"));
        assert!(!is_hex_color("zzzzzz"));
    }
}
