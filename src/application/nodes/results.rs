//! Search and compare results
//!
//! The search-and-compare root holds two kinds of results: pinned ones,
//! restored from workspace state, and transient ones added during the
//! session. Pinned results sort first; within each group newer results
//! come first.

use std::cell::{Cell, RefCell};
use std::cmp::Reverse;

use chrono::Utc;
use tracing::debug;

use crate::domain::entities::{
    comparison_pin_id, search_pin_id, LogQuery, NamedRef, PinnedItem, SearchLabels, SearchPattern,
};
use crate::error::{ViewError, ViewResult};

use super::commit::commit_node;
use super::item::{Collapsible, TreeItem};
use super::message::{load_more, message};
use super::paging::PagingState;
use super::repository::repository_id;
use super::{NodeKind, NodeRef, RefreshOutcome, ViewNode};

/// Commits reachable from `ref1` but not from `ref2`
pub struct CompareResultsNode {
    pub repo_path: String,
    pub ref1: NamedRef,
    pub ref2: NamedRef,
    pub notation: Option<String>,
    /// Pin timestamp, `None` while transient
    pub(crate) pinned: Cell<Option<i64>>,
    order: i64,
    pub(crate) paging: RefCell<PagingState>,
}

pub struct SearchResultsNode {
    pub repo_path: String,
    pub search: SearchPattern,
    pub labels: SearchLabels,
    pub(crate) pinned: Cell<Option<i64>>,
    order: i64,
    pub(crate) paging: RefCell<PagingState>,
}

fn pinned_cell(node: &ViewNode) -> Option<&Cell<Option<i64>>> {
    match node.kind() {
        NodeKind::CompareResults(c) => Some(&c.pinned),
        NodeKind::SearchResults(s) => Some(&s.pinned),
        _ => None,
    }
}

/// Pin timestamp of a result node
pub(crate) fn pinned_at(node: &ViewNode) -> Option<i64> {
    pinned_cell(node).and_then(Cell::get)
}

fn sort_key(node: &NodeRef) -> (bool, Reverse<i64>) {
    let order = match node.kind() {
        NodeKind::CompareResults(c) => c.pinned.get().unwrap_or(c.order),
        NodeKind::SearchResults(s) => s.pinned.get().unwrap_or(s.order),
        _ => 0,
    };
    (pinned_at(node).is_none(), Reverse(order))
}

/// Id the result is pinned under
pub(crate) fn pin_id(node: &ViewNode) -> Option<String> {
    match node.kind() {
        NodeKind::CompareResults(c) => Some(comparison_pin_id(
            &c.repo_path,
            &c.ref1.reference,
            &c.ref2.reference,
        )),
        NodeKind::SearchResults(s) => Some(search_pin_id(&s.repo_path, &s.search)),
        _ => None,
    }
}

fn pinned_item(node: &ViewNode, timestamp: i64) -> Option<PinnedItem> {
    match node.kind() {
        NodeKind::CompareResults(c) => Some(PinnedItem::Comparison {
            timestamp,
            path: c.repo_path.clone(),
            ref1: c.ref1.clone(),
            ref2: c.ref2.clone(),
            notation: c.notation.clone(),
        }),
        NodeKind::SearchResults(s) => Some(PinnedItem::Search {
            timestamp,
            path: s.repo_path.clone(),
            labels: s.labels.clone(),
            search: s.search.clone(),
        }),
        _ => None,
    }
}

pub(crate) fn compare_node(
    root: &NodeRef,
    repo_path: &str,
    ref1: NamedRef,
    ref2: NamedRef,
    notation: Option<String>,
    pinned: Option<i64>,
) -> NodeRef {
    let id = format!(
        "{}:compare({}|{})",
        repository_id(repo_path),
        ref1.reference,
        ref2.reference
    );
    root.child(
        id,
        NodeKind::CompareResults(CompareResultsNode {
            repo_path: repo_path.to_string(),
            ref1,
            ref2,
            notation,
            pinned: Cell::new(pinned),
            order: Utc::now().timestamp_millis(),
            paging: RefCell::new(PagingState::default()),
        }),
    )
}

pub(crate) fn search_node(
    root: &NodeRef,
    repo_path: &str,
    search: SearchPattern,
    labels: SearchLabels,
    pinned: Option<i64>,
) -> NodeRef {
    let id = format!("{}:search({})", repository_id(repo_path), search.key());
    root.child(
        id,
        NodeKind::SearchResults(SearchResultsNode {
            repo_path: repo_path.to_string(),
            search,
            labels,
            pinned: Cell::new(pinned),
            order: Utc::now().timestamp_millis(),
            paging: RefCell::new(PagingState::default()),
        }),
    )
}

fn node_for_pin(root: &NodeRef, item: PinnedItem) -> NodeRef {
    match item {
        PinnedItem::Comparison {
            timestamp,
            path,
            ref1,
            ref2,
            notation,
        } => compare_node(root, &path, ref1, ref2, notation, Some(timestamp)),
        PinnedItem::Search {
            timestamp,
            path,
            labels,
            search,
        } => search_node(root, &path, search, labels, Some(timestamp)),
    }
}

fn pinned_nodes(root: &NodeRef) -> ViewResult<Vec<NodeRef>> {
    let Some(pins) = root.context().pins() else {
        return Ok(Vec::new());
    };
    Ok(pins
        .get_pinned()?
        .into_iter()
        .map(|(_, item)| node_for_pin(root, item))
        .collect())
}

fn sorted(mut children: Vec<NodeRef>) -> Vec<NodeRef> {
    children.sort_by_key(sort_key);
    children
}

fn update_message(root: &NodeRef, children: &[NodeRef]) {
    let ctx = root.context();
    if children.is_empty() {
        ctx.set_message(Some(ctx.view().empty_message().to_string()));
    } else {
        ctx.set_message(None);
    }
}

pub(super) fn root_children(node: &NodeRef) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        update_message(node, &children);
        return Ok(children);
    }
    let children = sorted(pinned_nodes(node)?);
    update_message(node, &children);
    Ok(node.store_children(children))
}

pub(super) fn root_tree_item(node: &NodeRef) -> TreeItem {
    TreeItem::new(node.id(), node.context().view().title(), Collapsible::Expanded)
        .context("viewtree:search-and-compare")
}

/// Re-reads pins while keeping transient results
pub(super) fn root_refresh(node: &NodeRef, reset: bool) -> ViewResult<RefreshOutcome> {
    let current = node.cached_children().unwrap_or_default();
    let restored = pinned_nodes(node)?;

    let mut keep = Vec::new();
    let mut dropped = Vec::new();
    for child in current {
        let pinned_elsewhere = restored.iter().any(|r| r.id() == child.id());
        if pinned_at(&child).is_none() && !pinned_elsewhere {
            keep.push(child);
        } else {
            dropped.push(child);
        }
    }
    for child in dropped {
        child.dispose();
    }
    if reset {
        for child in &keep {
            child.refresh(true)?;
        }
    }

    keep.extend(restored);
    node.replace_children(sorted(keep));
    Ok(RefreshOutcome::Changed)
}

/// Adds `result` to the root, replacing a result with the same id.
///
/// When `keep_results` is off previous transient results are removed first.
pub(crate) fn add_result(root: &NodeRef, result: NodeRef, keep_results: bool) -> ViewResult<NodeRef> {
    root.children()?;
    let current = root.cached_children().unwrap_or_default();

    let mut children = Vec::with_capacity(current.len() + 1);
    for child in current {
        if child.id() == result.id() {
            if let (Some(previous), Some(cell)) = (pinned_at(&child), pinned_cell(&result)) {
                cell.set(Some(previous));
            }
            child.dispose();
        } else if !keep_results && pinned_at(&child).is_none() {
            debug!(id = child.id(), "replacing previous result");
            child.dispose();
        } else {
            children.push(child);
        }
    }
    children.insert(0, result.clone());

    let children = sorted(children);
    update_message(root, &children);
    root.replace_children(children);
    root.context().trigger_node_change(None);
    Ok(result)
}

/// Removes results matching `predicate`, unpinning them. Returns how many were removed.
pub(crate) fn remove_results(root: &NodeRef, predicate: impl Fn(&NodeRef) -> bool) -> ViewResult<usize> {
    let current = root.cached_children().unwrap_or_default();
    let (removed, kept): (Vec<_>, Vec<_>) = current.into_iter().partition(|c| predicate(c));
    if removed.is_empty() {
        return Ok(0);
    }

    for child in &removed {
        if pinned_at(child).is_some() {
            if let (Some(pins), Some(id)) = (root.context().pins(), pin_id(child)) {
                pins.update_pinned(&id, None)?;
            }
        }
        child.dispose();
    }
    update_message(root, &kept);
    root.replace_children(kept);
    root.context().trigger_node_change(None);
    Ok(removed.len())
}

/// Pins or unpins a result node, persisting the change
pub(crate) fn set_pinned(node: &NodeRef, pinned: bool) -> ViewResult<()> {
    let Some(cell) = pinned_cell(node) else {
        return Err(ViewError::InvalidArgument(format!(
            "{} is not a search or compare result",
            node.id()
        )));
    };
    let ctx = node.context();
    let pins = ctx.pins().ok_or_else(|| {
        ViewError::InvalidArgument("pinning requires workspace state".to_string())
    })?;
    let Some(id) = pin_id(node) else {
        return Ok(());
    };

    if pinned {
        let timestamp = Utc::now().timestamp_millis();
        if let Some(item) = pinned_item(node, timestamp) {
            pins.update_pinned(&id, Some(item))?;
        }
        cell.set(Some(timestamp));
    } else {
        pins.update_pinned(&id, None)?;
        cell.set(None);
    }

    if let Some(root) = node.parent() {
        if let Some(children) = root.cached_children() {
            root.replace_children(sorted(children));
        }
    }
    ctx.trigger_node_change(None);
    Ok(())
}

pub(super) fn compare_log_query(node: &ViewNode, data: &CompareResultsNode, limit: Option<usize>) -> LogQuery {
    LogQuery::new(&data.repo_path)
        .reference(format!("{}..{}", data.ref2.reference, data.ref1.reference))
        .limit(limit.unwrap_or(node.context().config().page_item_limit))
}

pub(super) fn search_log_query(node: &ViewNode, data: &SearchResultsNode, limit: Option<usize>) -> LogQuery {
    LogQuery::new(&data.repo_path)
        .search(data.search.clone())
        .limit(limit.unwrap_or(node.context().config().page_item_limit))
}

pub(super) fn compare_children(node: &NodeRef, _data: &CompareResultsNode) -> ViewResult<Vec<NodeRef>> {
    results_children(node)
}

pub(super) fn search_children(node: &NodeRef, _data: &SearchResultsNode) -> ViewResult<Vec<NodeRef>> {
    results_children(node)
}

fn results_children(node: &NodeRef) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let log = node.ensure_log()?;
    let Some(log) = log.filter(|log| !log.is_empty()) else {
        return Ok(vec![message(node, "No results could be found.")]);
    };

    let mut children: Vec<NodeRef> = log
        .entries
        .iter()
        .map(|commit| commit_node(node, commit.clone()))
        .collect();
    if log.has_more {
        children.push(load_more(node));
    }
    Ok(node.store_children(children))
}

fn results_description(node: &ViewNode) -> String {
    let count = node.loaded_count();
    if count == 0 && node.has_more() {
        return String::new();
    }
    let more = if node.has_more() { "+" } else { "" };
    let noun = if count == 1 { "commit" } else { "commits" };
    format!("{count}{more} {noun}")
}

fn results_context(kind: &str, pinned: bool) -> String {
    let mut context = format!("viewtree:results:{kind}");
    if pinned {
        context.push_str("+pinned");
    }
    context
}

pub(super) fn compare_tree_item(node: &NodeRef, data: &CompareResultsNode) -> TreeItem {
    let label = format!(
        "Comparing {} with {}",
        data.ref1.display(),
        data.ref2.display()
    );
    TreeItem::new(node.id(), label, Collapsible::Collapsed)
        .description(results_description(node))
        .tooltip(format!("{}..{}", data.ref2.reference, data.ref1.reference))
        .context(results_context("comparison", data.pinned.get().is_some()))
}

pub(super) fn search_tree_item(node: &NodeRef, data: &SearchResultsNode) -> TreeItem {
    TreeItem::new(node.id(), &data.labels.label, Collapsible::Collapsed)
        .description(results_description(node))
        .tooltip(&data.labels.query_label)
        .context(results_context("search", data.pinned.get().is_some()))
}
