//! Change events delivered to subscribed nodes
//!
//! Three event sources feed the tree:
//! - repository changes (refs, index, config, stash, ...)
//! - file-system changes under a repository working tree
//! - active-editor changes (which file and selection the user is looking at)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::selection::LineRange;

/// Category of a repository change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryChange {
    Config,
    Closed,
    Heads,
    Index,
    Remotes,
    RemoteProviders,
    Stash,
    Status,
    Tags,
    Unknown,
}

impl RepositoryChange {
    pub fn parse(value: &str) -> Option<Self> {
        let change = match value.trim().to_lowercase().as_str() {
            "config" => Self::Config,
            "closed" => Self::Closed,
            "heads" => Self::Heads,
            "index" => Self::Index,
            "remotes" => Self::Remotes,
            "remote-providers" | "remoteproviders" => Self::RemoteProviders,
            "stash" => Self::Stash,
            "status" => Self::Status,
            "tags" => Self::Tags,
            "unknown" => Self::Unknown,
            _ => return None,
        };
        Some(change)
    }
}

/// How a set of categories is matched against an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// At least one of the categories changed
    #[default]
    Any,
    /// Every one of the categories changed
    All,
}

/// A repository reported that something inside it changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryChangeEvent {
    pub repo_path: String,
    pub changes: BTreeSet<RepositoryChange>,
}

impl RepositoryChangeEvent {
    pub fn new(repo_path: impl Into<String>, changes: impl IntoIterator<Item = RepositoryChange>) -> Self {
        Self {
            repo_path: repo_path.into(),
            changes: changes.into_iter().collect(),
        }
    }

    /// Returns true if the event matches `categories` under `mode`
    pub fn changed(&self, categories: &[RepositoryChange], mode: ComparisonMode) -> bool {
        match mode {
            ComparisonMode::Any => categories.iter().any(|c| self.changes.contains(c)),
            ComparisonMode::All => {
                !categories.is_empty() && categories.iter().all(|c| self.changes.contains(c))
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.changes.contains(&RepositoryChange::Closed)
    }
}

/// Files changed on disk inside a repository working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemChangeEvent {
    pub repo_path: String,
    /// Repository-relative paths, `/` separated
    pub paths: Vec<String>,
}

impl FileSystemChangeEvent {
    /// Whether any changed path is `path` itself
    pub fn touches_file(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Whether any changed path lives under `folder`
    pub fn touches_folder(&self, folder: &str) -> bool {
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            return !self.paths.is_empty();
        }
        self.paths.iter().any(|p| {
            p == folder
                || p.strip_prefix(folder)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// The thing the user is looking at: a file, optionally at a revision and selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorSubject {
    pub repo_path: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<LineRange>,
    #[serde(default)]
    pub folder: bool,
}

impl EditorSubject {
    pub fn file(repo_path: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            path: path.into(),
            sha: None,
            selection: None,
            folder: false,
        }
    }

    pub fn with_selection(mut self, selection: LineRange) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn at_revision(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }
}

/// Active editor (or its selection) changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditorEvent {
    /// `None` when no trackable editor is active
    pub subject: Option<EditorSubject>,
    /// Selection is still being extended (mouse drag, shift+arrows)
    pub pending: bool,
}

/// Any event a node may subscribe to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Repository(RepositoryChangeEvent),
    FileSystem(FileSystemChangeEvent),
    ActiveEditor(ActiveEditorEvent),
}

impl ChangeEvent {
    /// Repository the event belongs to, if any
    pub fn repo_path(&self) -> Option<&str> {
        match self {
            ChangeEvent::Repository(e) => Some(&e.repo_path),
            ChangeEvent::FileSystem(e) => Some(&e.repo_path),
            ChangeEvent::ActiveEditor(_) => None,
        }
    }
}
