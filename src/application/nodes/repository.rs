//! Repository rows and their "Last fetched" refresh timer

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use crate::application::events::RefreshTimer;
use crate::domain::entities::RepositoryInfo;
use crate::domain::services::describe_age;
use crate::domain::value_objects::{ChangeEvent, RepositoryChange, ViewKind};
use crate::error::ViewResult;

use super::branch::{branch_id, BranchNode, BranchOptions};
use super::branch_folder::{branch_hierarchy_children, remote_id, BranchScope, RemoteNode};
use super::commit::{stash_id, StashNode};
use super::item::{Collapsible, TreeItem};
use super::message::message;
use super::{NodeKind, NodeRef, RefreshOutcome, ViewNode};

const COMMITS_CHANGES: &[RepositoryChange] = &[
    RepositoryChange::Config,
    RepositoryChange::Heads,
    RepositoryChange::Index,
    RepositoryChange::Remotes,
    RepositoryChange::RemoteProviders,
    RepositoryChange::Status,
    RepositoryChange::Unknown,
];

const BRANCHES_CHANGES: &[RepositoryChange] = &[
    RepositoryChange::Config,
    RepositoryChange::Heads,
    RepositoryChange::Remotes,
    RepositoryChange::RemoteProviders,
    RepositoryChange::Unknown,
];

const STASH_CHANGES: &[RepositoryChange] = &[RepositoryChange::Stash, RepositoryChange::Unknown];

/// A repository within a repository-listing view
pub struct RepositoryNode {
    pub repo: RepositoryInfo,
}

pub(crate) fn repository_id(path: &str) -> String {
    format!("viewtree:repository({path})")
}

/// In the commits view a repository shows its current branch's content directly
pub(super) fn splats_into_branch(node: &ViewNode) -> bool {
    node.context().view() == ViewKind::Commits
}

fn relevant_changes(view: ViewKind) -> &'static [RepositoryChange] {
    match view {
        ViewKind::Commits => COMMITS_CHANGES,
        ViewKind::Stashes => STASH_CHANGES,
        _ => BRANCHES_CHANGES,
    }
}

pub(super) fn children(node: &NodeRef, data: &RepositoryNode) -> ViewResult<Vec<NodeRef>> {
    let ctx = node.context();
    let path = data.repo.path.as_str();

    if ctx.view() == ViewKind::Commits {
        let branch_node = match node.cached_children().and_then(|c| c.into_iter().next()) {
            Some(branch_node) => branch_node,
            None => {
                let Some(branch) = ctx.git().get_branch(path)? else {
                    ctx.set_message(Some(ctx.view().empty_message().to_string()));
                    return Ok(Vec::new());
                };
                let options = BranchOptions {
                    root: true,
                    expanded: true,
                    limit_commits: !node.is_splatted(),
                    show_tracking: ctx.config().commits.show_tracking,
                    label: None,
                };
                let id = branch_id(node.id(), &branch.name, true);
                let child = node.child(id, NodeKind::Branch(BranchNode::new(branch, options)));
                node.store_children(vec![child.clone()]);
                child
            }
        };
        return branch_node.children();
    }

    if let Some(children) = node.cached_children() {
        return Ok(children);
    }

    let children = match ctx.view() {
        ViewKind::Branches => {
            let mut branches: Vec<_> = ctx
                .git()
                .get_branches(path)?
                .into_iter()
                .filter(|b| !b.remote)
                .collect();
            if branches.is_empty() {
                return Ok(vec![message(node, ctx.view().empty_message())]);
            }
            branches.sort_by(|a, b| {
                b.current
                    .cmp(&a.current)
                    .then_with(|| b.starred.cmp(&a.starred))
                    .then_with(|| a.name.cmp(&b.name))
            });
            branch_hierarchy_children(node, path, BranchScope::Local, branches)
        }
        ViewKind::Remotes => {
            let remotes = ctx.git().get_remotes(path)?;
            if remotes.is_empty() {
                return Ok(vec![message(node, ctx.view().empty_message())]);
            }
            remotes
                .into_iter()
                .map(|remote| {
                    node.child(
                        remote_id(node.id(), &remote.name),
                        NodeKind::Remote(RemoteNode { remote }),
                    )
                })
                .collect()
        }
        ViewKind::Stashes => {
            let entries = ctx
                .git()
                .get_stash(path)?
                .map(|stash| stash.entries)
                .unwrap_or_default();
            if entries.is_empty() {
                return Ok(vec![message(node, ctx.view().empty_message())]);
            }
            entries
                .into_iter()
                .map(|entry| {
                    node.child(
                        stash_id(node.id(), &entry.sha),
                        NodeKind::Stash(StashNode { entry }),
                    )
                })
                .collect()
        }
        _ => Vec::new(),
    };
    Ok(node.store_children(children))
}

pub(super) fn tree_item(node: &NodeRef, data: &RepositoryNode) -> ViewResult<TreeItem> {
    let mut item = TreeItem::new(node.id(), &data.repo.name, Collapsible::Expanded)
        .tooltip(&data.repo.path)
        .context("viewtree:repository");
    if let Some(description) = view_description(node, data)? {
        item = item.description(description);
    }
    Ok(item)
}

/// `<tracking> • <branch> • Last fetched <age>` in the commits view
pub(super) fn view_description(node: &ViewNode, data: &RepositoryNode) -> ViewResult<Option<String>> {
    let ctx = node.context();
    if ctx.view() != ViewKind::Commits {
        return Ok(None);
    }

    let git = ctx.git();
    let mut parts = Vec::new();
    if let Some(branch) = git.get_branch(&data.repo.path)? {
        if let Some(status) = branch.tracking_status() {
            parts.push(status);
        }
        parts.push(branch.name);
    }
    if let Some(fetched) = git.get_last_fetched(&data.repo.path)? {
        let age = (Utc::now() - fetched).to_std().unwrap_or_default();
        parts.push(format!("Last fetched {}", describe_age(age)));
    }

    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join(" \u{2022} ")))
    }
}

/// Time since the repository was last fetched, read fresh on every call
pub(super) fn last_fetched_age(node: &ViewNode, data: &RepositoryNode) -> Option<Duration> {
    match node.context().git().get_last_fetched(&data.repo.path) {
        Ok(fetched) => fetched.map(|at| (Utc::now() - at).to_std().unwrap_or_default()),
        Err(err) => {
            debug!(id = node.id(), %err, "no last-fetched time");
            None
        }
    }
}

/// Timer that repaints the "Last fetched" description while it is still moving
pub(super) fn start_timer(node: &ViewNode, data: &RepositoryNode, now: Instant) -> Option<RefreshTimer> {
    if node.context().view() != ViewKind::Commits {
        return None;
    }
    RefreshTimer::start(last_fetched_age(node, data)?, now)
}

/// A soft refresh in the commits view keeps the branch and its fetched log
pub(super) fn refresh(node: &NodeRef, reset: bool) -> ViewResult<RefreshOutcome> {
    if !reset && splats_into_branch(node) {
        if let Some(children) = node.cached_children() {
            for child in &children {
                child.refresh(false)?;
            }
            return Ok(RefreshOutcome::Changed);
        }
    }
    node.discard_children();
    Ok(RefreshOutcome::Changed)
}

pub(super) fn on_change(
    node: &NodeRef,
    data: &RepositoryNode,
    event: &ChangeEvent,
    now: Instant,
) -> ViewResult<()> {
    let ChangeEvent::Repository(event) = event else {
        return Ok(());
    };
    let ctx = node.context();

    if event.is_closed() {
        debug!(id = node.id(), "repository closed");
        let parent = node.parent();
        node.dispose();
        if let Some(parent) = parent {
            ctx.refresh_node(&parent, true, false)?;
        }
        return Ok(());
    }

    if !event.changed(relevant_changes(ctx.view()), ctx.config().change_comparison) {
        debug!(id = node.id(), changes = ?event.changes, "ignoring repository change");
        return Ok(());
    }

    debug!(
        id = node.id(),
        repo = %data.repo.path,
        changes = ?event.changes,
        "triggering node refresh"
    );
    // a fetch may have happened
    node.restart_timer(now);
    ctx.refresh_node(node, true, false)
}
