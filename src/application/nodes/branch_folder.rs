//! Branch folders built from `/`-separated names, and remotes

use std::cmp::Ordering;

use crate::config::BranchesLayout;
use crate::domain::entities::{Branch, Remote};
use crate::domain::services::{join_relative, make_hierarchical, HierarchicalItem};
use crate::error::ViewResult;

use super::branch::{branch_id, BranchNode, BranchOptions};
use super::item::{Collapsible, TreeItem};
use super::{repository_id, NodeKind, NodeRef};

/// Which set of branches a folder belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchScope {
    Local,
    Remote(String),
}

impl BranchScope {
    fn key(&self) -> String {
        match self {
            BranchScope::Local => "branches".to_string(),
            BranchScope::Remote(name) => format!("remote({name})"),
        }
    }
}

/// A folder of branches sharing a name prefix
pub struct BranchFolderNode {
    pub repo_path: String,
    pub scope: BranchScope,
    pub item: HierarchicalItem<Branch>,
}

/// A configured remote and its branches
pub struct RemoteNode {
    pub remote: Remote,
}

pub(super) fn remote_id(parent_id: &str, name: &str) -> String {
    format!("{parent_id}:remote({name})")
}

/// Branch nodes for `branches`, as a list or as a compacted folder tree
pub(super) fn branch_hierarchy_children(
    parent: &NodeRef,
    repo_path: &str,
    scope: BranchScope,
    branches: Vec<Branch>,
) -> Vec<NodeRef> {
    if parent.context().config().branches.layout == BranchesLayout::List {
        return branches
            .into_iter()
            .map(|branch| branch_leaf(parent, branch, None))
            .collect();
    }

    let always = |_: &Branch| true;
    let root = make_hierarchical(
        branches,
        |b: &Branch| b.path_segments(),
        join_relative,
        true,
        Some(&always as &dyn Fn(&Branch) -> bool),
    );
    hierarchy_nodes(parent, repo_path, &scope, &root)
}

fn hierarchy_nodes(
    parent: &NodeRef,
    repo_path: &str,
    scope: &BranchScope,
    item: &HierarchicalItem<Branch>,
) -> Vec<NodeRef> {
    let mut entries: Vec<(bool, String, NodeRef)> = item
        .children()
        .iter()
        .map(|child| match &child.value {
            Some(branch) => (
                false,
                child.name.clone(),
                branch_leaf(parent, branch.clone(), Some(child.name.clone())),
            ),
            None => {
                let id = format!(
                    "{}:branch-folder({}|{})",
                    repository_id(repo_path),
                    scope.key(),
                    child.relative_path
                );
                let folder = BranchFolderNode {
                    repo_path: repo_path.to_string(),
                    scope: scope.clone(),
                    item: child.clone(),
                };
                (true, child.name.clone(), parent.child(id, NodeKind::BranchFolder(folder)))
            }
        })
        .collect();

    entries.sort_by(|(a_folder, a_name, _), (b_folder, b_name, _)| {
        b_folder
            .cmp(a_folder)
            .then_with(|| compare_labels(a_name, b_name))
    });
    entries.into_iter().map(|(_, _, node)| node).collect()
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn branch_leaf(parent: &NodeRef, branch: Branch, label: Option<String>) -> NodeRef {
    let id = branch_id(&repository_id(&branch.repo_path), &branch.name, false);
    let options = BranchOptions {
        root: false,
        expanded: false,
        limit_commits: true,
        show_tracking: !branch.remote,
        label,
    };
    parent.child(id, NodeKind::Branch(BranchNode::new(branch, options)))
}

pub(super) fn folder_children(node: &NodeRef, data: &BranchFolderNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let children = hierarchy_nodes(node, &data.repo_path, &data.scope, &data.item);
    Ok(node.store_children(children))
}

pub(super) fn folder_tree_item(node: &NodeRef, data: &BranchFolderNode) -> TreeItem {
    TreeItem::new(node.id(), &data.item.name, Collapsible::Collapsed)
        .tooltip(&data.item.relative_path)
        .context("viewtree:branch-folder")
}

pub(super) fn remote_children(node: &NodeRef, data: &RemoteNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let remote = &data.remote;
    let mut branches: Vec<_> = node
        .context()
        .git()
        .get_branches(&remote.repo_path)?
        .into_iter()
        .filter(|b| b.remote && b.remote_name() == Some(remote.name.as_str()))
        .collect();
    branches.sort_by(|a, b| a.name.cmp(&b.name));

    let children = branch_hierarchy_children(
        node,
        &remote.repo_path,
        BranchScope::Remote(remote.name.clone()),
        branches,
    );
    Ok(node.store_children(children))
}

pub(super) fn remote_tree_item(node: &NodeRef, data: &RemoteNode) -> TreeItem {
    let mut context = String::from("viewtree:remote");
    if data.remote.default {
        context.push_str("+default");
    }
    TreeItem::new(node.id(), &data.remote.name, Collapsible::Collapsed)
        .description(&data.remote.url)
        .context(context)
}
