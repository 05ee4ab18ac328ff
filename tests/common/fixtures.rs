//! Repository snapshot builders

use serde_json::{json, Map, Value};

pub const REPO: &str = "/work/app";

/// Sha of the `i`-th commit created by [`RepoFixture::linear_history`]
pub fn sha(i: usize) -> String {
    format!("c{i:03}")
}

/// One repository of a snapshot
#[derive(Debug, Clone)]
pub struct RepoFixture {
    path: String,
    branches: Vec<Value>,
    commits: Vec<Value>,
    history: Map<String, Value>,
    stash: Vec<Value>,
    status: Vec<Value>,
    last_fetched: Option<String>,
}

impl RepoFixture {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            branches: Vec::new(),
            commits: Vec::new(),
            history: Map::new(),
            stash: Vec::new(),
            status: Vec::new(),
            last_fetched: None,
        }
    }

    /// Current branch tracking `origin/<name>`, `ahead` commits unpublished
    pub fn current_branch(mut self, name: &str, ahead: usize) -> Self {
        self.branches.push(json!({
            "name": name,
            "current": true,
            "upstream": { "name": format!("origin/{name}") },
            "state": { "ahead": ahead }
        }));
        self
    }

    pub fn branch(mut self, name: &str) -> Self {
        self.branches.push(json!({ "name": name }));
        self
    }

    /// `count` commits on `branch`, newest first, each touching `src/lib.rs`
    pub fn linear_history(mut self, branch: &str, count: usize) -> Self {
        let mut shas = Vec::with_capacity(count);
        for i in 0..count {
            self.commits.push(json!({
                "sha": sha(i),
                "author": "Ada",
                "date": "2026-03-01T10:00:00Z",
                "message": format!("Change {i}"),
                "files": [{ "path": "src/lib.rs", "hunks": [{ "start": i + 1, "end": i + 1 }] }]
            }));
            shas.push(Value::String(sha(i)));
        }
        self.history.insert(branch.to_string(), Value::Array(shas));
        self
    }

    pub fn modified(mut self, path: &str) -> Self {
        self.status.push(json!({ "path": path, "status": "modified" }));
        self
    }

    pub fn stash(mut self, sha: &str, message: &str) -> Self {
        let index = self.stash.len();
        self.stash.push(json!({
            "sha": sha,
            "index": index,
            "message": message,
            "date": "2026-03-02T10:00:00Z",
            "files": [{ "path": "notes.txt", "status": "added" }]
        }));
        self
    }

    /// RFC 3339 time of the last fetch
    pub fn last_fetched(mut self, at: &str) -> Self {
        self.last_fetched = Some(at.to_string());
        self
    }

    fn to_value(&self) -> Value {
        json!({
            "last_fetched": self.last_fetched,
            "path": self.path,
            "branches": self.branches,
            "commits": self.commits,
            "history": self.history,
            "stash": self.stash,
            "status": self.status
        })
    }
}

/// Snapshot JSON for `repos`
pub fn workspace(repos: &[RepoFixture]) -> String {
    let repositories: Vec<_> = repos.iter().map(RepoFixture::to_value).collect();
    json!({ "repositories": repositories }).to_string()
}

/// Single repository with `count` commits on `main`
pub fn simple_workspace(count: usize, ahead: usize) -> String {
    workspace(&[RepoFixture::new(REPO)
        .current_branch("main", ahead)
        .linear_history("main", count)])
}
