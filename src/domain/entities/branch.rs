//! Branch entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream a local branch tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub name: String,
    /// The configured upstream no longer exists on the remote
    #[serde(default)]
    pub missing: bool,
}

/// Commits ahead of and behind the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackingState {
    #[serde(default)]
    pub ahead: usize,
    #[serde(default)]
    pub behind: usize,
}

/// A local or remote branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub repo_path: String,
    pub name: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub detached: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub upstream: Option<Upstream>,
    #[serde(default)]
    pub state: TrackingState,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Branch {
    pub fn local(repo_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            name: name.into(),
            sha: None,
            current: false,
            remote: false,
            detached: false,
            starred: false,
            upstream: None,
            state: TrackingState::default(),
            date: None,
        }
    }

    /// Name with the leading remote segment stripped from remote branches
    pub fn name_without_remote(&self) -> &str {
        if self.remote {
            self.name
                .split_once('/')
                .map(|(_, rest)| rest)
                .unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    /// Remote segment of a remote branch name
    pub fn remote_name(&self) -> Option<&str> {
        if self.remote {
            self.name.split_once('/').map(|(remote, _)| remote)
        } else {
            None
        }
    }

    /// Last segment of the branch name
    pub fn basename(&self) -> &str {
        let name = self.name_without_remote();
        name.rsplit('/').next().unwrap_or(name)
    }

    /// Folder segments used when branches are laid out as a tree
    pub fn path_segments(&self) -> Vec<String> {
        self.name_without_remote()
            .split('/')
            .map(str::to_string)
            .collect()
    }

    pub fn has_live_upstream(&self) -> bool {
        self.upstream.as_ref().is_some_and(|u| !u.missing)
    }

    /// Compact ahead/behind summary, `None` without an upstream
    pub fn tracking_status(&self) -> Option<String> {
        if !self.has_live_upstream() {
            return None;
        }
        let TrackingState { ahead, behind } = self.state;
        let status = match (ahead, behind) {
            (0, 0) => "up to date".to_string(),
            (a, 0) => format!("{a}↑"),
            (0, b) => format!("{b}↓"),
            (a, b) => format!("{b}↓ {a}↑"),
        };
        Some(status)
    }
}
