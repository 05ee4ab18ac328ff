//! Paged commit logs
//!
//! A [`PagedLog`] is an immutable snapshot of the first `count()` entries of
//! a history query. Asking the repository service for more returns a new
//! snapshot; getting the very same `Rc` back means no progress was possible.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::LineRange;

use super::commit::Commit;
use super::pinned::SearchPattern;

/// What history to list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogQuery {
    pub repo_path: String,
    /// Ref or `a..b` range; `None` means the current branch
    #[serde(default)]
    pub reference: Option<String>,
    /// Restrict to commits touching this file or folder
    #[serde(default)]
    pub path: Option<String>,
    /// Restrict to commits touching these lines of `path`
    #[serde(default)]
    pub range: Option<LineRange>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub search: Option<SearchPattern>,
    /// Maximum number of entries, 0 for all of them
    #[serde(default)]
    pub limit: usize,
}

impl LogQuery {
    pub fn new(repo_path: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            ..Self::default()
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn lines(mut self, range: LineRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn search(mut self, pattern: SearchPattern) -> Self {
        self.search = Some(pattern);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// How far to extend a paged log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Fetch this many more entries
    Size(usize),
    /// Fetch until the entry with this sha is included
    Until(String),
}

/// Immutable page of a commit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedLog {
    pub query: LogQuery,
    pub entries: Vec<Commit>,
    /// More entries exist beyond `entries`
    pub has_more: bool,
}

impl PagedLog {
    pub fn new(query: LogQuery, entries: Vec<Commit>, has_more: bool) -> Rc<Self> {
        Rc::new(Self {
            query,
            entries,
            has_more,
        })
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, sha: &str) -> bool {
        self.entries.iter().any(|c| c.sha == sha)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
