//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ComparisonMode;
use crate::error::ViewResult;

use super::loader::{self, ConfigWarning};

/// How the files of a commit, stash or folder are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilesLayout {
    /// Flat list sorted by path
    List,
    /// Folder hierarchy
    Tree,
    /// Tree once the file count exceeds the threshold, list otherwise
    #[default]
    Auto,
}

impl FilesLayout {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "list" => Some(FilesLayout::List),
            "tree" => Some(FilesLayout::Tree),
            "auto" => Some(FilesLayout::Auto),
            _ => None,
        }
    }
}

/// How branches are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BranchesLayout {
    List,
    #[default]
    Tree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default)]
    pub layout: FilesLayout,
    #[serde(default = "default_true")]
    pub compact: bool,
    #[serde(default = "default_files_threshold")]
    pub threshold: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            layout: FilesLayout::default(),
            compact: true,
            threshold: default_files_threshold(),
        }
    }
}

impl FilesConfig {
    /// Whether `count` files should be shown as a folder tree
    pub fn use_tree(&self, count: usize) -> bool {
        match self.layout {
            FilesLayout::List => false,
            FilesLayout::Tree => true,
            FilesLayout::Auto => count > self.threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BranchesConfig {
    #[serde(default)]
    pub layout: BranchesLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitsConfig {
    /// Show ahead/behind nodes above the commit list
    #[serde(default = "default_true")]
    pub show_tracking: bool,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            show_tracking: true,
        }
    }
}

/// Settings shared by every view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Page size used by "load more" and for root branches
    #[serde(default = "default_page_item_limit")]
    pub page_item_limit: usize,

    /// First page size for non-root branches
    #[serde(default = "default_item_limit")]
    pub default_item_limit: usize,

    /// Page size used while searching for a node
    #[serde(default = "default_max_list_items")]
    pub max_list_items: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_find_max_depth")]
    pub find_max_depth: usize,

    /// How repository change categories are matched
    #[serde(default)]
    pub change_comparison: ComparisonMode,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub commits: CommitsConfig,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            page_item_limit: default_page_item_limit(),
            default_item_limit: default_item_limit(),
            max_list_items: default_max_list_items(),
            debounce_ms: default_debounce_ms(),
            find_max_depth: default_find_max_depth(),
            change_comparison: ComparisonMode::default(),
            files: FilesConfig::default(),
            branches: BranchesConfig::default(),
            commits: CommitsConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_files_threshold() -> usize {
    5
}

fn default_page_item_limit() -> usize {
    40
}

fn default_item_limit() -> usize {
    10
}

fn default_max_list_items() -> usize {
    200
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_find_max_depth() -> usize {
    2
}

impl ViewsConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ViewResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ViewResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> Self {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (VIEWTREE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
