//! Property tests for building and compacting path hierarchies.

use std::collections::BTreeSet;

use proptest::prelude::*;

use viewtree::domain::services::{compact_hierarchy, join_relative, make_hierarchical, HierarchicalItem};

fn split(value: &String) -> Vec<String> {
    value.split('/').map(str::to_string).collect()
}

/// Distinct paths where no path is a strict prefix folder of another
fn leaf_paths() -> impl Strategy<Value = Vec<String>> {
    let segment = proptest::string::string_regex("[a-d]{1,2}").unwrap();
    let path = proptest::collection::vec(segment, 1..=4).prop_map(|s| s.join("/"));
    proptest::collection::btree_set(path, 1..=24).prop_map(|set: BTreeSet<String>| {
        let all: Vec<String> = set.iter().cloned().collect();
        set.into_iter()
            .filter(|p| !all.iter().any(|other| other.starts_with(&format!("{p}/"))))
            .collect()
    })
}

fn walk<'a>(root: &'a HierarchicalItem<String>, segments: &[String]) -> Option<&'a HierarchicalItem<String>> {
    let mut node = root;
    for segment in segments {
        node = node.child(segment)?;
    }
    Some(node)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every value is reachable by its own path and the root sees all of them.
    #[test]
    fn property_values_reachable_by_path(paths in leaf_paths()) {
        let root = make_hierarchical(paths.clone(), split, join_relative, false, None);

        for path in &paths {
            let node = walk(&root, &split(path));
            prop_assert!(node.is_some(), "{} is not reachable", path);
            prop_assert_eq!(node.and_then(|n| n.value.as_ref()), Some(path));
        }

        let mut descendants = root.descendants.clone();
        descendants.sort();
        let mut expected = paths.clone();
        expected.sort();
        prop_assert_eq!(descendants, expected);
    }

    /// PROPERTY: compaction keeps every value and a second pass changes nothing.
    #[test]
    fn property_compaction_is_idempotent(paths in leaf_paths()) {
        let always = |_: &String| true;
        let can_compact: Option<&dyn Fn(&String) -> bool> = Some(&always);
        let mut once = make_hierarchical(paths.clone(), split, join_relative, true, can_compact);
        let snapshot = once.clone();

        compact_hierarchy(&mut once, &join_relative, true, can_compact);
        prop_assert_eq!(&once, &snapshot);

        let mut values: Vec<String> = once.values().into_iter().cloned().collect();
        values.sort();
        let mut expected = paths.clone();
        expected.sort();
        prop_assert_eq!(values, expected);
    }

    /// PROPERTY: a folder's count covers everything below it, at every depth.
    #[test]
    fn property_descendants_cover_subtree(paths in leaf_paths()) {
        let root = make_hierarchical(paths, split, join_relative, false, None);
        let mut stack = vec![&root];
        while let Some(node) = stack.pop() {
            let below: usize = node
                .children()
                .iter()
                .map(|c| c.descendants.len() + usize::from(c.value.is_some()))
                .sum();
            prop_assert_eq!(node.descendants.len(), below);
            stack.extend(node.children());
        }
    }
}

#[test]
fn single_chain_collapses_into_leaf() {
    // The value `leaf1` lives at path a/b/c
    type Entry = (String, String);
    let always = |_: &Entry| true;
    let root = make_hierarchical(
        vec![("a/b/c".to_string(), "leaf1".to_string())],
        |(path, _): &Entry| split(path),
        join_relative,
        true,
        Some(&always as &dyn Fn(&Entry) -> bool),
    );

    assert_eq!(root.children().len(), 1);
    let only = &root.children()[0];
    assert_eq!(only.name, "a/b/c");
    assert_eq!(only.value.as_ref().map(|(_, value)| value.as_str()), Some("leaf1"));
    assert!(only.is_leaf());
}

#[test]
fn chain_without_compactable_leaf_stops_at_folder() {
    let root = make_hierarchical(
        vec!["a/b/c/leaf1".to_string()],
        split,
        join_relative,
        true,
        None,
    );

    let folder = &root.children()[0];
    assert_eq!(folder.name, "a/b/c");
    assert_eq!(folder.value, None);
    assert_eq!(folder.children()[0].name, "leaf1");
}
