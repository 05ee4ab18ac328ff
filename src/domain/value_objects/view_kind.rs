//! Which view a tree renders

use serde::{Deserialize, Serialize};

/// The views a tree controller can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Commits,
    Branches,
    Remotes,
    Stashes,
    FileHistory,
    LineHistory,
    SearchAndCompare,
}

impl ViewKind {
    /// Stable identifier, also used as the root node id suffix
    pub fn id(&self) -> &'static str {
        match self {
            ViewKind::Commits => "commits",
            ViewKind::Branches => "branches",
            ViewKind::Remotes => "remotes",
            ViewKind::Stashes => "stashes",
            ViewKind::FileHistory => "file-history",
            ViewKind::LineHistory => "line-history",
            ViewKind::SearchAndCompare => "search-and-compare",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Commits => "Commits",
            ViewKind::Branches => "Branches",
            ViewKind::Remotes => "Remotes",
            ViewKind::Stashes => "Stashes",
            ViewKind::FileHistory => "File History",
            ViewKind::LineHistory => "Line History",
            ViewKind::SearchAndCompare => "Search & Compare",
        }
    }

    /// Message shown when the view has nothing to list
    pub fn empty_message(&self) -> &'static str {
        match self {
            ViewKind::Commits => "No commits could be found.",
            ViewKind::Branches => "No branches could be found.",
            ViewKind::Remotes => "No remotes could be found.",
            ViewKind::Stashes => "No stashes could be found.",
            ViewKind::FileHistory => "No file history could be found.",
            ViewKind::LineHistory => "No line history could be found.",
            ViewKind::SearchAndCompare => "No results.",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value.trim().to_lowercase().as_str() {
            "commits" => ViewKind::Commits,
            "branches" => ViewKind::Branches,
            "remotes" => ViewKind::Remotes,
            "stashes" => ViewKind::Stashes,
            "file-history" | "filehistory" => ViewKind::FileHistory,
            "line-history" | "linehistory" => ViewKind::LineHistory,
            "search-and-compare" | "searchandcompare" | "search" => ViewKind::SearchAndCompare,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether the view lists repositories at its root
    pub fn is_repository_view(&self) -> bool {
        matches!(
            self,
            ViewKind::Commits | ViewKind::Branches | ViewKind::Remotes | ViewKind::Stashes
        )
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
