//! Repository-level entities: the repository itself, remotes, stashes and working-tree status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commit::{CommitFile, FileChangeKind};

/// An open repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub path: String,
    pub name: String,
}

impl RepositoryInfo {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&path)
            .to_string();
        Self { path, name }
    }
}

/// A configured remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    #[serde(default)]
    pub repo_path: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub default: bool,
}

/// One entry of the stash list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    #[serde(default)]
    pub repo_path: String,
    pub sha: String,
    pub index: usize,
    pub message: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

impl StashEntry {
    /// `stash@{N}`
    pub fn stash_name(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

/// The stash list of a repository
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stash {
    pub repo_path: String,
    pub entries: Vec<StashEntry>,
}

/// Working-tree status of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    #[serde(default)]
    pub repo_path: String,
    pub path: String,
    #[serde(default)]
    pub status: FileChangeKind,
    #[serde(default)]
    pub staged: bool,
}
