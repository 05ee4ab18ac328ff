//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{ViewError, ViewResult};

use super::types::{FilesLayout, ViewsConfig};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ViewResult<(ViewsConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: ViewsConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ViewError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
pub fn load_or_default(project_root: Option<&Path>) -> ViewsConfig {
    let mut candidates = Vec::new();
    if let Some(root) = project_root {
        candidates.push(root.join(".viewtree/config.toml"));
    }
    if let Some(user_config_dir) = dirs::config_dir() {
        candidates.push(user_config_dir.join("viewtree/config.toml"));
    }

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_with_warnings(&path) {
            Ok((config, warnings)) => {
                for w in &warnings {
                    warn!(
                        key = %w.key,
                        file = %w.file.display(),
                        line = ?w.line,
                        suggestion = ?w.suggestion,
                        "unknown config key"
                    );
                }
                return with_env_overrides(config);
            }
            Err(err) => warn!(file = %path.display(), %err, "ignoring unreadable config"),
        }
    }

    with_env_overrides(ViewsConfig::default())
}

/// Apply environment variable overrides (VIEWTREE_* prefix)
pub fn with_env_overrides(config: ViewsConfig) -> ViewsConfig {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary key lookup
pub(crate) fn apply_overrides(
    mut config: ViewsConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ViewsConfig {
    let number = |key: &str| -> Option<usize> {
        let raw = lookup(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key, value = %raw, "ignoring non-numeric override");
                None
            }
        }
    };

    if let Some(limit) = number("VIEWTREE_PAGE_ITEM_LIMIT") {
        config.page_item_limit = limit;
    }
    if let Some(limit) = number("VIEWTREE_DEFAULT_ITEM_LIMIT") {
        config.default_item_limit = limit;
    }
    if let Some(limit) = number("VIEWTREE_MAX_LIST_ITEMS") {
        config.max_list_items = limit;
    }
    if let Some(layout) = lookup("VIEWTREE_FILES_LAYOUT") {
        match FilesLayout::parse(&layout) {
            Some(layout) => config.files.layout = layout,
            None => warn!(value = %layout, "ignoring unknown files layout"),
        }
    }

    config
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(key))
        .map(|index| index + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const KNOWN_KEYS: &[&str] = &[
        "page_item_limit",
        "default_item_limit",
        "max_list_items",
        "debounce_ms",
        "find_max_depth",
        "change_comparison",
        "files",
        "layout",
        "compact",
        "threshold",
        "branches",
        "commits",
        "show_tracking",
    ];

    KNOWN_KEYS
        .iter()
        .map(|known| (edit_distance(unknown, known), *known))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, known)| known.to_string())
}

/// Levenshtein distance over chars, one row at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != *cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }

    row[b.len()]
}
