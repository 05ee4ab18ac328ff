//! JSON fixture repository
//!
//! Implements the RepositoryService port over a snapshot file, so views can
//! be rendered and tested without a Git binary. Commit order in the file is
//! log order (newest first); `history` lists, per ref, the shas reachable
//! from it in the same order.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::domain::entities::{
    Branch, Commit, FileStatus, LogQuery, PageRequest, PagedLog, Remote, RepositoryInfo, Stash,
    StashEntry,
};
use crate::domain::ports::{RepositoryError, RepositoryResult, RepositoryService};
use crate::error::ViewResult;

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    repositories: Vec<FixtureRepository>,
}

#[derive(Debug, Deserialize)]
struct FixtureRepository {
    path: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    last_fetched: Option<DateTime<Utc>>,
    #[serde(default)]
    branches: Vec<Branch>,
    #[serde(default)]
    remotes: Vec<Remote>,
    #[serde(default)]
    commits: Vec<Commit>,
    #[serde(default)]
    history: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    stash: Vec<StashEntry>,
    #[serde(default)]
    status: Vec<FileStatus>,
}

impl FixtureRepository {
    /// Fills in the repository path the file leaves implicit
    fn normalize(mut self) -> Self {
        let path = self.path.clone();
        for branch in &mut self.branches {
            branch.repo_path = path.clone();
        }
        for remote in &mut self.remotes {
            remote.repo_path = path.clone();
        }
        for commit in &mut self.commits {
            commit.repo_path = path.clone();
        }
        for entry in &mut self.stash {
            entry.repo_path = path.clone();
        }
        for status in &mut self.status {
            status.repo_path = path.clone();
        }
        self
    }

    fn info(&self) -> RepositoryInfo {
        let mut info = RepositoryInfo::new(&self.path);
        if let Some(name) = &self.name {
            info.name = name.clone();
        }
        info
    }

    fn current_branch(&self) -> Option<&Branch> {
        self.branches.iter().find(|b| b.current)
    }

    /// Shas reachable from `reference`, newest first
    fn reachable(&self, reference: &str) -> Option<Vec<String>> {
        if let Some(shas) = self.history.get(reference) {
            return Some(shas.clone());
        }
        // A sha: everything from it onwards on a ref that contains it
        self.history.values().find_map(|shas| {
            let start = shas
                .iter()
                .position(|sha| sha == reference || sha.starts_with(reference))?;
            Some(shas[start..].to_vec())
        })
    }

    fn resolve(&self, reference: Option<&str>) -> Option<Vec<String>> {
        let reference = match reference {
            Some(reference) => reference.to_string(),
            None => self.current_branch()?.name.clone(),
        };
        match reference.split_once("..") {
            Some((base, head)) => {
                let excluded: HashSet<String> =
                    self.reachable(base).unwrap_or_default().into_iter().collect();
                let included = self.reachable(head)?;
                Some(
                    included
                        .into_iter()
                        .filter(|sha| !excluded.contains(sha))
                        .collect(),
                )
            }
            None => self.reachable(&reference),
        }
    }

    /// Every entry matching `query`, ignoring its limit
    fn entries(&self, query: &LogQuery) -> Option<Vec<Commit>> {
        let shas = if query.search.is_some() && query.reference.is_none() {
            self.commits.iter().map(|c| c.sha.clone()).collect()
        } else {
            self.resolve(query.reference.as_deref())?
        };

        let by_sha: BTreeMap<&str, &Commit> =
            self.commits.iter().map(|c| (c.sha.as_str(), c)).collect();
        let entries = shas
            .iter()
            .filter_map(|sha| by_sha.get(sha.as_str()).copied())
            .filter(|commit| matches_query(commit, query))
            .cloned()
            .collect();
        Some(entries)
    }
}

fn matches_query(commit: &Commit, query: &LogQuery) -> bool {
    if let Some(path) = &query.path {
        if !(commit.touches_file(path) || commit.touches_folder(path)) {
            return false;
        }
        if let Some(range) = &query.range {
            let touches = commit
                .files
                .iter()
                .any(|f| &f.path == path && f.touches_lines(range));
            if !touches {
                return false;
            }
        }
    }
    if !query.authors.is_empty() && !query.authors.iter().any(|a| a == &commit.author) {
        return false;
    }
    if let Some(search) = &query.search {
        let normalize = |s: &str| {
            if search.match_case {
                s.to_string()
            } else {
                s.to_lowercase()
            }
        };
        let message = normalize(&commit.message);
        let mut terms = search.pattern.split_whitespace().map(normalize);
        let matches = |term: String| message.contains(&term) || commit.sha.starts_with(&term);
        let found = if search.match_all {
            terms.all(matches)
        } else {
            terms.any(matches)
        };
        if !found {
            return false;
        }
    }
    true
}

fn page(query: LogQuery, all: &[Commit], count: usize) -> Rc<PagedLog> {
    let count = count.min(all.len());
    PagedLog::new(query, all[..count].to_vec(), count < all.len())
}

/// RepositoryService backed by a JSON snapshot
#[derive(Debug, Default)]
pub struct FixtureRepositoryService {
    source: Option<PathBuf>,
    data: RefCell<FixtureFile>,
    calls: RefCell<BTreeMap<&'static str, usize>>,
}

impl FixtureRepositoryService {
    pub fn from_json(json: &str) -> ViewResult<Self> {
        Ok(Self {
            source: None,
            data: RefCell::new(parse(json)?),
            calls: RefCell::default(),
        })
    }

    pub fn from_path(path: &Path) -> ViewResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            data: RefCell::new(parse(&content)?),
            calls: RefCell::default(),
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Re-reads the snapshot file. A service built from a string keeps its data.
    pub fn reload(&self) -> ViewResult<()> {
        let Some(path) = &self.source else {
            return Ok(());
        };
        let content = std::fs::read_to_string(path)?;
        self.data.replace(parse(&content)?);
        debug!(path = %path.display(), "fixture reloaded");
        Ok(())
    }

    /// How often `method` was called
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().get(method).copied().unwrap_or(0)
    }

    /// Calls that fetched log pages
    pub fn log_fetches(&self) -> usize {
        self.call_count("get_log") + self.call_count("more_log")
    }

    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, method: &'static str) {
        trace!(method, "fixture call");
        *self.calls.borrow_mut().entry(method).or_default() += 1;
    }

    fn with_repo<T>(
        &self,
        repo_path: &str,
        f: impl FnOnce(&FixtureRepository) -> T,
    ) -> RepositoryResult<T> {
        let data = self.data.borrow();
        let repo = data
            .repositories
            .iter()
            .find(|r| r.path == repo_path)
            .ok_or_else(|| RepositoryError::NotFound {
                path: repo_path.to_string(),
            })?;
        Ok(f(repo))
    }
}

fn parse(json: &str) -> ViewResult<FixtureFile> {
    let mut file: FixtureFile = serde_json::from_str(json)?;
    file.repositories = file
        .repositories
        .into_iter()
        .map(FixtureRepository::normalize)
        .collect();
    Ok(file)
}

impl RepositoryService for FixtureRepositoryService {
    fn repositories(&self) -> RepositoryResult<Vec<RepositoryInfo>> {
        self.record("repositories");
        Ok(self
            .data
            .borrow()
            .repositories
            .iter()
            .map(FixtureRepository::info)
            .collect())
    }

    fn get_log(&self, query: &LogQuery) -> RepositoryResult<Option<Rc<PagedLog>>> {
        self.record("get_log");
        self.with_repo(&query.repo_path, |repo| {
            let all = repo.entries(query)?;
            if all.is_empty() {
                return None;
            }
            let count = if query.limit == 0 { all.len() } else { query.limit };
            Some(page(query.clone(), &all, count))
        })
    }

    fn more_log(
        &self,
        log: &Rc<PagedLog>,
        request: &PageRequest,
    ) -> RepositoryResult<Option<Rc<PagedLog>>> {
        self.record("more_log");
        if !log.has_more {
            return Ok(Some(Rc::clone(log)));
        }
        self.with_repo(&log.query.repo_path, |repo| {
            let Some(all) = repo.entries(&log.query) else {
                return None;
            };
            let current = log.count();
            let count = match request {
                PageRequest::Size(size) => current.saturating_add(*size),
                PageRequest::Until(sha) => {
                    let Some(offset) = all.iter().skip(current).position(|c| &c.sha == sha) else {
                        return Some(Rc::clone(log));
                    };
                    current + offset + 1
                }
            };
            if count.min(all.len()) <= current {
                return Some(Rc::clone(log));
            }
            let query = log.query.clone().limit(count.min(all.len()));
            Some(page(query, &all, count))
        })
    }

    fn get_branch(&self, repo_path: &str) -> RepositoryResult<Option<Branch>> {
        self.record("get_branch");
        self.with_repo(repo_path, |repo| repo.current_branch().cloned())
    }

    fn get_branches(&self, repo_path: &str) -> RepositoryResult<Vec<Branch>> {
        self.record("get_branches");
        self.with_repo(repo_path, |repo| repo.branches.clone())
    }

    fn get_remotes(&self, repo_path: &str) -> RepositoryResult<Vec<Remote>> {
        self.record("get_remotes");
        self.with_repo(repo_path, |repo| repo.remotes.clone())
    }

    fn get_stash(&self, repo_path: &str) -> RepositoryResult<Option<Stash>> {
        self.record("get_stash");
        self.with_repo(repo_path, |repo| {
            (!repo.stash.is_empty()).then(|| Stash {
                repo_path: repo.path.clone(),
                entries: repo.stash.clone(),
            })
        })
    }

    fn get_status_for_path(&self, repo_path: &str, path: &str) -> RepositoryResult<Vec<FileStatus>> {
        self.record("get_status_for_path");
        let folder = format!("{}/", path.trim_end_matches('/'));
        self.with_repo(repo_path, |repo| {
            repo.status
                .iter()
                .filter(|s| s.path == path || s.path.starts_with(&folder))
                .cloned()
                .collect()
        })
    }

    fn branch_contains_commit(&self, repo_path: &str, branch: &str, sha: &str) -> RepositoryResult<bool> {
        self.record("branch_contains_commit");
        self.with_repo(repo_path, |repo| {
            repo.history
                .get(branch)
                .is_some_and(|shas| shas.iter().any(|s| s == sha))
        })
    }

    fn get_last_fetched(&self, repo_path: &str) -> RepositoryResult<Option<DateTime<Utc>>> {
        self.record("get_last_fetched");
        self.with_repo(repo_path, |repo| repo.last_fetched)
    }
}
