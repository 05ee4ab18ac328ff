//! Tests for the config module

use std::collections::HashMap;
use std::fs;

use tempfile::tempdir;

use super::loader::apply_overrides;
use super::types::*;
use crate::domain::value_objects::ComparisonMode;

#[test]
fn test_config_default() {
    let config = ViewsConfig::default();

    assert_eq!(config.page_item_limit, 40);
    assert_eq!(config.default_item_limit, 10);
    assert_eq!(config.max_list_items, 200);
    assert_eq!(config.debounce_ms, 250);
    assert_eq!(config.find_max_depth, 2);
    assert_eq!(config.change_comparison, ComparisonMode::Any);
    assert_eq!(config.files.layout, FilesLayout::Auto);
    assert!(config.files.compact);
    assert_eq!(config.branches.layout, BranchesLayout::Tree);
    assert!(config.commits.show_tracking);
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
page_item_limit = 25
change_comparison = "all"

[files]
layout = "tree"
compact = false

[branches]
layout = "list"
"#;
    let config: ViewsConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.page_item_limit, 25);
    assert_eq!(config.default_item_limit, 10);
    assert_eq!(config.change_comparison, ComparisonMode::All);
    assert_eq!(config.files.layout, FilesLayout::Tree);
    assert!(!config.files.compact);
    assert_eq!(config.files.threshold, 5);
    assert_eq!(config.branches.layout, BranchesLayout::List);
}

#[test]
fn test_unknown_keys_become_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "page_item_limt = 5\n\n[files]\nlayout = \"list\"\n").unwrap();

    let (config, warnings) = ViewsConfig::load_with_warnings(&path).unwrap();
    assert_eq!(config.page_item_limit, 40);
    assert_eq!(config.files.layout, FilesLayout::List);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "page_item_limt");
    assert_eq!(warnings[0].line, Some(1));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("page_item_limit"));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "page_item_limit = \"many\"").unwrap();

    let err = ViewsConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("invalid config"));
}

#[test]
fn test_project_config_is_found() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".viewtree")).unwrap();
    fs::write(
        dir.path().join(".viewtree/config.toml"),
        "find_max_depth = 4\n",
    )
    .unwrap();

    let config = ViewsConfig::load_or_default(Some(dir.path()));
    assert_eq!(config.find_max_depth, 4);
}

#[test]
fn test_overrides_apply_and_ignore_garbage() {
    let vars: HashMap<&str, &str> = [
        ("VIEWTREE_PAGE_ITEM_LIMIT", "7"),
        ("VIEWTREE_MAX_LIST_ITEMS", "lots"),
        ("VIEWTREE_FILES_LAYOUT", "TREE"),
    ]
    .into_iter()
    .collect();

    let config = apply_overrides(ViewsConfig::default(), |key| {
        vars.get(key).map(|v| v.to_string())
    });
    assert_eq!(config.page_item_limit, 7);
    assert_eq!(config.max_list_items, 200);
    assert_eq!(config.files.layout, FilesLayout::Tree);
}

#[test]
fn test_files_layout_threshold() {
    let files = FilesConfig::default();
    assert!(!files.use_tree(5));
    assert!(files.use_tree(6));

    let list = FilesConfig {
        layout: FilesLayout::List,
        ..FilesConfig::default()
    };
    assert!(!list.use_tree(100));
}
