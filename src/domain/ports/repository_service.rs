//! RepositoryService port - read access to Git history and refs
//!
//! Nodes never talk to Git directly. Everything they list comes through
//! this trait so the tree can run against a live repository or a fixture.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::{
    Branch, FileStatus, LogQuery, PageRequest, PagedLog, Remote, RepositoryInfo, Stash,
};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository not found: {path}")]
    NotFound { path: String },

    #[error("unknown ref '{reference}' in {path}")]
    UnknownRef { path: String, reference: String },

    #[error("git command failed: {0}")]
    Command(String),

    #[error("repository service unavailable: {0}")]
    Unavailable(String),
}

pub trait RepositoryService {
    /// Repositories currently open, in display order
    fn repositories(&self) -> RepositoryResult<Vec<RepositoryInfo>>;

    /// First page of a history query, `None` when the query has no history
    fn get_log(&self, query: &LogQuery) -> RepositoryResult<Option<Rc<PagedLog>>>;

    /// Extends `log`.
    ///
    /// Returns the very same `Rc` when nothing more could be loaded and
    /// `None` when the log can no longer be extended at all.
    fn more_log(
        &self,
        log: &Rc<PagedLog>,
        request: &PageRequest,
    ) -> RepositoryResult<Option<Rc<PagedLog>>>;

    /// Checked-out branch
    fn get_branch(&self, repo_path: &str) -> RepositoryResult<Option<Branch>>;

    /// All local and remote branches
    fn get_branches(&self, repo_path: &str) -> RepositoryResult<Vec<Branch>>;

    fn get_remotes(&self, repo_path: &str) -> RepositoryResult<Vec<Remote>>;

    fn get_stash(&self, repo_path: &str) -> RepositoryResult<Option<Stash>>;

    /// Working-tree status of a file, or of every file below a folder
    fn get_status_for_path(&self, repo_path: &str, path: &str)
        -> RepositoryResult<Vec<FileStatus>>;

    /// Whether `sha` is reachable from `branch`
    fn branch_contains_commit(
        &self,
        repo_path: &str,
        branch: &str,
        sha: &str,
    ) -> RepositoryResult<bool>;

    fn get_last_fetched(&self, repo_path: &str) -> RepositoryResult<Option<DateTime<Utc>>>;
}
