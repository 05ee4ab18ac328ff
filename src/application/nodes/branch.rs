//! Branch rows with tracking status and a paged commit log

use std::cell::RefCell;

use crate::domain::entities::{Branch, LogQuery};
use crate::domain::services::widen_for_unpublished;
use crate::error::ViewResult;

use super::commit::commit_node;
use super::item::{Collapsible, TreeItem};
use super::message::{load_more, message, separator};
use super::paging::PagingState;
use super::{NodeKind, NodeRef, ViewNode};

#[derive(Debug, Clone, Default)]
pub struct BranchOptions {
    /// Top-level branch of a commits view
    pub root: bool,
    pub expanded: bool,
    /// Use the smaller default page for the first fetch
    pub limit_commits: bool,
    pub show_tracking: bool,
    /// Label to show instead of the branch name (compacted folder path)
    pub label: Option<String>,
}

/// A branch and its commits
pub struct BranchNode {
    pub branch: Branch,
    pub options: BranchOptions,
    pub(crate) paging: RefCell<PagingState>,
}

impl BranchNode {
    pub fn new(branch: Branch, options: BranchOptions) -> Self {
        Self {
            branch,
            options,
            paging: RefCell::new(PagingState::default()),
        }
    }
}

pub(super) fn branch_id(parent_id: &str, name: &str, root: bool) -> String {
    if root {
        format!("{parent_id}:branch({name}):root")
    } else {
        format!("{parent_id}:branch({name})")
    }
}

pub(super) fn log_query(node: &ViewNode, data: &BranchNode, limit: Option<usize>) -> LogQuery {
    let config = node.context().config();
    let limit = limit.unwrap_or(if data.options.root && !data.options.limit_commits {
        config.page_item_limit
    } else {
        config.default_item_limit
    });
    let reference = if data.branch.detached {
        data.branch.sha.clone().unwrap_or_else(|| data.branch.name.clone())
    } else {
        data.branch.name.clone()
    };

    LogQuery::new(&data.branch.repo_path)
        .reference(reference)
        .limit(widen_for_unpublished(limit, data.branch.state.ahead))
}

pub(super) fn children(node: &NodeRef, data: &BranchNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }

    let Some(log) = node.ensure_log()? else {
        return Ok(vec![message(node, "No commits could be found.")]);
    };

    let mut children = Vec::new();
    if data.options.show_tracking && !data.branch.remote {
        let branch = &data.branch;
        if branch.has_live_upstream() {
            let state = branch.state;
            if data.options.root && state.ahead == 0 && state.behind == 0 {
                children.push(tracking_node(node, branch, TrackingKind::Same, data.options.root));
            } else {
                if state.behind > 0 {
                    children.push(tracking_node(node, branch, TrackingKind::Behind, data.options.root));
                }
                if state.ahead > 0 {
                    children.push(tracking_node(node, branch, TrackingKind::Ahead, data.options.root));
                }
            }
        } else if data.options.root {
            children.push(tracking_node(node, branch, TrackingKind::None, data.options.root));
        }
    }
    if !children.is_empty() {
        children.push(separator(node));
    }

    children.extend(log.entries.iter().map(|commit| commit_node(node, commit.clone())));
    if log.has_more {
        children.push(load_more(node));
    }
    Ok(node.store_children(children))
}

pub(super) fn tree_item(node: &NodeRef, data: &BranchNode) -> TreeItem {
    let branch = &data.branch;
    let label = data
        .options
        .label
        .clone()
        .unwrap_or_else(|| branch.name_without_remote().to_string());
    let collapsible = if data.options.expanded {
        Collapsible::Expanded
    } else {
        Collapsible::Collapsed
    };

    let mut description = Vec::new();
    if let Some(status) = branch.tracking_status() {
        description.push(status);
    }
    if let Some(upstream) = &branch.upstream {
        description.push(upstream.name.clone());
    }

    let mut context = String::from("viewtree:branch");
    if branch.current {
        context.push_str("+current");
    }
    if branch.remote {
        context.push_str("+remote");
    }
    if branch.has_live_upstream() {
        context.push_str("+tracking");
    }

    let mut tooltip = branch.name.clone();
    if branch.current {
        tooltip.push_str(" (current)");
    }
    if let Some(upstream) = &branch.upstream {
        if upstream.missing {
            tooltip.push_str(&format!(", missing upstream {}", upstream.name));
        } else {
            tooltip.push_str(&format!(", tracking {}", upstream.name));
        }
    }

    TreeItem::new(node.id(), label, collapsible)
        .description(description.join(" "))
        .tooltip(tooltip)
        .context(context)
}

/// Which side of the upstream comparison a status node shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingKind {
    Ahead,
    Behind,
    Same,
    None,
}

impl TrackingKind {
    fn suffix(&self) -> &'static str {
        match self {
            TrackingKind::Ahead => "ahead",
            TrackingKind::Behind => "behind",
            TrackingKind::Same => "same",
            TrackingKind::None => "none",
        }
    }
}

/// Ahead/behind summary above a branch's commits
pub struct TrackingStatusNode {
    pub branch: Branch,
    pub kind: TrackingKind,
    pub root: bool,
}

fn tracking_node(parent: &NodeRef, branch: &Branch, kind: TrackingKind, root: bool) -> NodeRef {
    let repo_id = super::repository_id(&branch.repo_path);
    let id = format!("{repo_id}:status-branch({}):{}", branch.name, kind.suffix());
    parent.child(
        id,
        NodeKind::BranchTrackingStatus(TrackingStatusNode {
            branch: branch.clone(),
            kind,
            root,
        }),
    )
}

pub(super) fn tracking_children(node: &NodeRef, data: &TrackingStatusNode) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let Some(upstream) = data.branch.upstream.as_ref() else {
        return Ok(Vec::new());
    };
    let range = match data.kind {
        TrackingKind::Ahead => format!("{}..{}", upstream.name, data.branch.name),
        TrackingKind::Behind => format!("{}..{}", data.branch.name, upstream.name),
        TrackingKind::Same | TrackingKind::None => return Ok(Vec::new()),
    };

    let query = LogQuery::new(&data.branch.repo_path).reference(range);
    let commits = node
        .context()
        .git()
        .get_log(&query)?
        .map(|log| log.entries.clone())
        .unwrap_or_default();
    let children = commits
        .into_iter()
        .map(|commit| commit_node(node, commit))
        .collect();
    Ok(node.store_children(children))
}

pub(super) fn tracking_tree_item(node: &NodeRef, data: &TrackingStatusNode) -> TreeItem {
    let branch = &data.branch;
    let upstream = branch
        .upstream
        .as_ref()
        .map(|u| u.name.as_str())
        .unwrap_or_default();
    let plural = |n: usize| if n == 1 { "commit" } else { "commits" };

    let (label, collapsible) = match data.kind {
        TrackingKind::Ahead => (
            format!("{} {} ahead", branch.state.ahead, plural(branch.state.ahead)),
            Collapsible::Collapsed,
        ),
        TrackingKind::Behind => (
            format!("{} {} behind", branch.state.behind, plural(branch.state.behind)),
            Collapsible::Collapsed,
        ),
        TrackingKind::Same => (format!("Up to date with {upstream}"), Collapsible::None),
        TrackingKind::None => (
            format!("{} hasn't been published", branch.name),
            Collapsible::None,
        ),
    };

    let mut item = TreeItem::new(node.id(), label, collapsible)
        .context(format!("viewtree:status-branch:{}", data.kind.suffix()));
    if matches!(data.kind, TrackingKind::Ahead | TrackingKind::Behind) {
        item = item.description(upstream);
    }
    item
}
