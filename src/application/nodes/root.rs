//! View roots, which splat into a lone repository

use std::rc::Rc;

use crate::application::view::ViewContext;
use crate::domain::value_objects::ViewKind;
use crate::error::ViewResult;

use super::history::{HistoryMode, HistoryTrackerNode};
use super::item::{Collapsible, TreeItem};
use super::repository::{self, RepositoryNode};
use super::{NodeKind, NodeRef, RefreshOutcome, ViewNode};

/// Root node for `ctx`'s view
pub(crate) fn create_root(ctx: &Rc<ViewContext>) -> NodeRef {
    let view = ctx.view();
    let kind = match view {
        ViewKind::FileHistory => {
            NodeKind::HistoryTracker(HistoryTrackerNode::new(HistoryMode::File, ctx.config()))
        }
        ViewKind::LineHistory => {
            NodeKind::HistoryTracker(HistoryTrackerNode::new(HistoryMode::Line, ctx.config()))
        }
        ViewKind::SearchAndCompare => NodeKind::SearchAndCompareRoot,
        ViewKind::Commits | ViewKind::Branches | ViewKind::Remotes | ViewKind::Stashes => {
            NodeKind::ViewRoot
        }
    };
    let id = match view {
        ViewKind::FileHistory => "viewtree:file-history:tracker".to_string(),
        ViewKind::LineHistory => "viewtree:line-history:tracker".to_string(),
        _ => format!("viewtree:{}", view.id()),
    };
    ViewNode::new(ctx, None, id, kind)
}

pub(super) fn children(node: &NodeRef) -> ViewResult<Vec<NodeRef>> {
    let ctx = node.context();

    let repositories = match node.cached_children() {
        Some(children) => children,
        None => {
            let repositories = ctx.git().repositories()?;
            if repositories.is_empty() {
                ctx.set_message(Some(ctx.view().empty_message().to_string()));
                return Ok(Vec::new());
            }
            ctx.set_message(None);
            let nodes = repositories
                .into_iter()
                .map(|repo| {
                    node.child(
                        repository::repository_id(&repo.path),
                        NodeKind::Repository(RepositoryNode { repo }),
                    )
                })
                .collect();
            node.store_children(nodes)
        }
    };

    if let [only] = repositories.as_slice() {
        if let NodeKind::Repository(repo) = only.kind() {
            ctx.set_description(repository::view_description(only, repo)?);
        }
        return only.children();
    }

    ctx.set_description(None);
    Ok(repositories)
}

pub(super) fn tree_item(node: &NodeRef) -> TreeItem {
    TreeItem::new(node.id(), node.context().view().title(), Collapsible::Expanded)
        .context("viewtree:view-root")
}

/// A soft refresh keeps repository nodes when the repository set is unchanged
pub(super) fn refresh(node: &NodeRef, reset: bool) -> ViewResult<RefreshOutcome> {
    let current = match node.cached_children() {
        Some(current) if !reset => current,
        _ => {
            node.discard_children();
            return Ok(RefreshOutcome::Changed);
        }
    };

    let repositories = node.context().git().repositories()?;
    let unchanged = current.len() == repositories.len()
        && current
            .iter()
            .zip(&repositories)
            .all(|(child, repo)| child.repo_path() == Some(repo.path.as_str()));
    if !unchanged {
        node.discard_children();
        return Ok(RefreshOutcome::Changed);
    }

    for child in &current {
        child.refresh(false)?;
    }
    Ok(RefreshOutcome::Changed)
}
