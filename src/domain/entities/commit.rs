//! Commit entity and the files it touched

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::LineRange;

use super::repository::FileStatus;

/// Pseudo sha used for working-tree changes
pub const UNCOMMITTED_SHA: &str = "0000000000000000000000000000000000000000";
/// Pseudo sha used for staged changes
pub const UNCOMMITTED_STAGED_SHA: &str = "0000000000000000000000000000000000000000:";

/// How a file changed in a commit or in the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileChangeKind {
    Added,
    #[default]
    Modified,
    Deleted,
    Renamed,
    Copied,
    Untracked,
    Conflicted,
}

impl FileChangeKind {
    /// Single-letter status code as shown by `git status --short`
    pub fn code(&self) -> char {
        match self {
            FileChangeKind::Added => 'A',
            FileChangeKind::Modified => 'M',
            FileChangeKind::Deleted => 'D',
            FileChangeKind::Renamed => 'R',
            FileChangeKind::Copied => 'C',
            FileChangeKind::Untracked => '?',
            FileChangeKind::Conflicted => 'U',
        }
    }
}

/// A file touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFile {
    pub path: String,
    #[serde(default)]
    pub status: FileChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    /// Line ranges (in the new revision) the commit touched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hunks: Vec<LineRange>,
}

impl CommitFile {
    pub fn new(path: impl Into<String>, status: FileChangeKind) -> Self {
        Self {
            path: path.into(),
            status,
            original_path: None,
            hunks: Vec::new(),
        }
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Parent directory, empty for files at the repository root
    pub fn directory(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }

    /// Whether the change touched any line in `range`.
    /// Files without recorded hunks are assumed to touch every line.
    pub fn touches_lines(&self, range: &LineRange) -> bool {
        self.hunks.is_empty() || self.hunks.iter().any(|h| h.intersects(range))
    }
}

/// A commit as listed in a log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub repo_path: String,
    pub sha: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

impl Commit {
    /// Builds the pseudo commit representing uncommitted work on one file
    pub fn uncommitted(status: &FileStatus, date: DateTime<Utc>) -> Self {
        let (sha, message) = if status.staged {
            (UNCOMMITTED_STAGED_SHA, "Staged changes")
        } else {
            (UNCOMMITTED_SHA, "Uncommitted changes")
        };
        Self {
            repo_path: status.repo_path.clone(),
            sha: sha.to_string(),
            author: "You".to_string(),
            date,
            message: message.to_string(),
            files: vec![CommitFile::new(status.path.clone(), status.status)],
        }
    }

    pub fn is_uncommitted(&self) -> bool {
        self.sha == UNCOMMITTED_SHA || self.sha == UNCOMMITTED_STAGED_SHA
    }

    pub fn short_sha(&self) -> &str {
        match self.sha.as_str() {
            UNCOMMITTED_SHA => "Working Tree",
            UNCOMMITTED_STAGED_SHA => "Index",
            sha => sha.get(..7).unwrap_or(sha),
        }
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    pub fn touches_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn touches_folder(&self, folder: &str) -> bool {
        let folder = folder.trim_end_matches('/');
        folder.is_empty()
            || self.files.iter().any(|f| {
                f.path
                    .strip_prefix(folder)
                    .is_some_and(|rest| rest.starts_with('/'))
            })
    }
}
