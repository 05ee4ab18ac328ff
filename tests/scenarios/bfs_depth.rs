//! Scenario: Searching a Deep Branch Hierarchy
//!
//! Journey: A host looks for a branch nested several folders deep.
//!
//! Steps:
//! 1. Branches view lists branches as a folder tree
//! 2. Host searches breadth-first for a branch node by id
//! 3. Search stops at the requested depth
//!
//! Success Criteria:
//! - A node at depth N is found with a limit of N
//! - The same node is not found with a limit of N - 1

use viewtree::domain::value_objects::ViewKind;
use viewtree::{FindOptions, ViewsConfig};

use crate::common::*;

const LEAF: &str = "viewtree:repository(/work/app):branch(deep/a/b/c/leaf)";

/// Each folder level has a sibling branch so the chain is not compacted
fn deep_workspace() -> String {
    workspace(&[RepoFixture::new(REPO)
        .current_branch("main", 0)
        .linear_history("main", 3)
        .branch("deep/x")
        .branch("deep/a/x")
        .branch("deep/a/b/x")
        .branch("deep/a/b/c/x")
        .branch("deep/a/b/c/leaf")])
}

fn harness() -> Harness {
    Harness::new(ViewKind::Branches, ViewsConfig::default(), &deep_workspace())
}

/// SCENARIO: The leaf sits five levels below the root
#[test]
fn scenario_leaf_found_at_its_depth() {
    let h = harness();

    let found = h
        .tree
        .find_node_by_id(LEAF, FindOptions::default().max_depth(5))
        .expect("leaf should be found at depth 5");

    assert_eq!(found.kind().name(), "branch");
    let folder = found.parent().expect("leaf has a folder");
    assert_eq!(h.tree.get_tree_item(&folder).expect("folder row").label, "c");
}

/// SCENARIO: One level short of the leaf
#[test]
fn scenario_leaf_missed_one_level_short() {
    let h = harness();

    assert!(h
        .tree
        .find_node_by_id(LEAF, FindOptions::default().max_depth(4))
        .is_none());
}

/// SCENARIO: Folder rows are shown before branch rows
#[test]
fn scenario_folders_sort_before_branches() {
    let h = harness();

    let rows = h.rows();
    let labels: Vec<_> = rows
        .iter()
        .map(|n| h.tree.get_tree_item(n).expect("row").label)
        .collect();

    assert_eq!(labels, vec!["deep", "main"]);
    let deep = h.tree.get_children(Some(&rows[0])).expect("folder children");
    assert_eq!(deep[0].kind().name(), "branch-folder");
    assert_eq!(deep[1].kind().name(), "branch");
}
