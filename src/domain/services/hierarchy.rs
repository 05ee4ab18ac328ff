//! Hierarchy Domain Service
//!
//! Turns flat, path-addressed values (changed files, branch names) into a
//! folder tree and optionally compacts single-child folder chains into one
//! node (`a` > `b` > `c` becomes `a/b/c`).

use std::collections::HashMap;

/// A folder or leaf in a hierarchy built by [`make_hierarchical`]
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalItem<T> {
    /// Display name; compaction joins several segments into one name
    pub name: String,
    /// Path from the root, joined with the caller's join function
    pub relative_path: String,
    /// Value whose path ends at this node
    pub value: Option<T>,
    /// Every value strictly below this node, in input order
    pub descendants: Vec<T>,
    children: Vec<HierarchicalItem<T>>,
    index: HashMap<String, usize>,
}

impl<T> HierarchicalItem<T> {
    pub fn root() -> Self {
        Self::folder(String::new(), String::new())
    }

    fn folder(name: String, relative_path: String) -> Self {
        Self {
            name,
            relative_path,
            value: None,
            descendants: Vec::new(),
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Children in first-seen order
    pub fn children(&self) -> &[HierarchicalItem<T>] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&HierarchicalItem<T>> {
        self.index.get(name).map(|&i| &self.children[i])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Values at this node and below, depth-first
    pub fn values(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a T>) {
        if let Some(value) = &self.value {
            out.push(value);
        }
        for child in &self.children {
            child.collect_values(out);
        }
    }

    fn child_entry(&mut self, name: &str, relative_path: String) -> &mut Self {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.children.len();
                self.children
                    .push(Self::folder(name.to_string(), relative_path));
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.children[idx]
    }
}

/// Joins a relative path and a segment with `/`, skipping an empty base
pub fn join_relative(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Builds a folder hierarchy from `values`.
///
/// `split_path` yields the path segments of a value; `join_path` combines
/// a parent's relative path with a segment. When `compact` is set the
/// result is passed through [`compact_hierarchy`].
pub fn make_hierarchical<T, S, J>(
    values: impl IntoIterator<Item = T>,
    split_path: S,
    join_path: J,
    compact: bool,
    can_compact: Option<&dyn Fn(&T) -> bool>,
) -> HierarchicalItem<T>
where
    T: Clone,
    S: Fn(&T) -> Vec<String>,
    J: Fn(&str, &str) -> String,
{
    let mut root = HierarchicalItem::root();

    for value in values {
        let segments = split_path(&value);
        if segments.is_empty() {
            root.descendants.push(value);
            continue;
        }

        let mut node = &mut root;
        for segment in &segments {
            node.descendants.push(value.clone());
            let relative_path = join_path(&node.relative_path, segment);
            node = node.child_entry(segment, relative_path);
        }
        node.value = Some(value);
    }

    if compact {
        compact_hierarchy(&mut root, &join_path, true, can_compact);
    }
    root
}

/// Merges every non-root folder that has exactly one child into that child.
///
/// The merge happens when the child is a folder, or when it is a value that
/// `can_compact` accepts. A node that carries a value of its own is never
/// merged. Children are compacted first, so a chain collapses completely
/// in one pass and a second pass is a no-op.
pub fn compact_hierarchy<T, J>(
    node: &mut HierarchicalItem<T>,
    join_path: &J,
    is_root: bool,
    can_compact: Option<&dyn Fn(&T) -> bool>,
) where
    J: Fn(&str, &str) -> String,
{
    for child in node.children.iter_mut() {
        compact_hierarchy(child, join_path, false, can_compact);
    }

    if is_root || node.value.is_some() || node.children.len() != 1 {
        return;
    }

    let mergeable = match &node.children[0].value {
        None => true,
        Some(value) => can_compact.is_some_and(|f| f(value)),
    };
    if !mergeable {
        return;
    }

    if let Some(child) = node.children.pop() {
        node.name = join_path(&node.name, &child.name);
        node.relative_path = child.relative_path;
        node.value = child.value;
        node.descendants = child.descendants;
        node.children = child.children;
        node.index = child.index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(value: &&str) -> Vec<String> {
        value.split('/').map(str::to_string).collect()
    }

    fn build(values: &[&'static str], compact: bool) -> HierarchicalItem<&'static str> {
        make_hierarchical(values.iter().copied(), split, join_relative, compact, None)
    }

    #[test]
    fn builds_folders_in_first_seen_order() {
        let root = build(&["src/b.rs", "src/a.rs", "README.md"], false);
        let names: Vec<_> = root.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["src", "README.md"]);

        let src = root.child("src").unwrap();
        assert_eq!(src.descendants, vec!["src/b.rs", "src/a.rs"]);
        assert_eq!(src.child("a.rs").unwrap().value, Some("src/a.rs"));
        assert_eq!(src.child("a.rs").unwrap().relative_path, "src/a.rs");
        assert_eq!(root.descendants.len(), 3);
    }

    #[test]
    fn compacts_folder_chain_into_folder() {
        let root = build(&["a/b/c/x.rs", "a/b/c/y.rs"], true);
        assert_eq!(root.children().len(), 1);
        let folder = &root.children()[0];
        assert_eq!(folder.name, "a/b/c");
        assert_eq!(folder.relative_path, "a/b/c");
        assert_eq!(folder.children().len(), 2);
    }

    #[test]
    fn compacts_single_leaf_chain_when_allowed() {
        let always = |_: &&str| true;
        let root = make_hierarchical(
            ["a/b/c"],
            split,
            join_relative,
            true,
            Some(&always as &dyn Fn(&&str) -> bool),
        );
        let leaf = &root.children()[0];
        assert_eq!(leaf.name, "a/b/c");
        assert_eq!(leaf.value, Some("a/b/c"));
        assert!(leaf.is_leaf());
    }

    #[test]
    fn leaf_is_kept_separate_without_permission() {
        let root = build(&["a/b/c"], true);
        let folder = &root.children()[0];
        assert_eq!(folder.name, "a/b");
        assert_eq!(folder.children()[0].name, "c");
        assert_eq!(folder.children()[0].value, Some("a/b/c"));
    }

    #[test]
    fn root_is_never_compacted() {
        let root = build(&["only/file.rs"], true);
        assert_eq!(root.name, "");
        assert_eq!(root.children()[0].name, "only");
    }

    #[test]
    fn node_with_its_own_value_is_not_merged() {
        let always = |_: &&str| true;
        let root = make_hierarchical(
            ["a", "a/b"],
            split,
            join_relative,
            true,
            Some(&always as &dyn Fn(&&str) -> bool),
        );
        let a = root.child("a").unwrap();
        assert_eq!(a.value, Some("a"));
        assert_eq!(a.child("b").unwrap().value, Some("a/b"));
    }

    #[test]
    fn values_lists_every_leaf() {
        let root = build(&["x/1", "x/2", "y"], true);
        let mut values: Vec<_> = root.values().into_iter().copied().collect();
        values.sort();
        assert_eq!(values, vec!["x/1", "x/2", "y"]);
    }
}
