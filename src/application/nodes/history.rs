//! File and line history
//!
//! A [`HistoryTrackerNode`] follows the active editor and owns exactly one
//! child: the history of whatever subject it currently tracks. Editor events
//! are debounced; the child is only replaced when the subject actually
//! changes.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use crate::application::events::Debouncer;
use crate::config::ViewsConfig;
use crate::domain::entities::{Commit, LogQuery};
use crate::domain::value_objects::{ChangeEvent, EditorSubject, LineRange, RepositoryChange};
use crate::error::ViewResult;

use super::commit::commit_node;
use super::item::{Collapsible, TreeItem};
use super::message::{load_more, message};
use super::paging::PagingState;
use super::repository::repository_id;
use super::{NodeKind, NodeRef, RefreshOutcome, ViewNode};

const HISTORY_CHANGES: &[RepositoryChange] = &[
    RepositoryChange::Index,
    RepositoryChange::Heads,
    RepositoryChange::Remotes,
    RepositoryChange::RemoteProviders,
    RepositoryChange::Status,
    RepositoryChange::Unknown,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    File,
    Line,
}

impl HistoryMode {
    fn title(&self) -> &'static str {
        match self {
            HistoryMode::File => "File History",
            HistoryMode::Line => "Line History",
        }
    }

    fn no_editor_message(&self) -> &'static str {
        match self {
            HistoryMode::File => "There are no editors open that can provide file history information.",
            HistoryMode::Line => "There are no editors open that can provide line history information.",
        }
    }

    /// File history ignores the selection so moving the cursor is not a change
    fn normalize(&self, mut subject: EditorSubject) -> EditorSubject {
        if *self == HistoryMode::File {
            subject.selection = None;
        }
        subject
    }
}

/// Root of a history view
pub struct HistoryTrackerNode {
    pub mode: HistoryMode,
    pub(crate) following: Cell<bool>,
    /// Subject the current child was built for
    current: RefCell<Option<EditorSubject>>,
    /// Most recent subject reported by the editor
    latest: RefCell<Option<EditorSubject>>,
    debouncer: RefCell<Debouncer<Option<EditorSubject>>>,
}

impl HistoryTrackerNode {
    pub fn new(mode: HistoryMode, config: &ViewsConfig) -> Self {
        Self {
            mode,
            following: Cell::new(true),
            current: RefCell::new(None),
            latest: RefCell::new(None),
            debouncer: RefCell::new(Debouncer::new(Duration::from_millis(config.debounce_ms))),
        }
    }

    pub fn is_following(&self) -> bool {
        self.following.get()
    }
}

pub struct FileHistoryNode {
    pub subject: EditorSubject,
    pub(crate) paging: RefCell<PagingState>,
}

pub struct LineHistoryNode {
    pub subject: EditorSubject,
    pub range: LineRange,
    pub(crate) paging: RefCell<PagingState>,
}

fn subject_description(subject: &EditorSubject, following: bool) -> String {
    let name = subject.path.rsplit('/').next().unwrap_or(&subject.path);
    let mut description = name.to_string();
    if let Some(sha) = &subject.sha {
        description.push_str(&format!(" ({})", sha.get(..7).unwrap_or(sha)));
    }
    if !following {
        description.push_str(" (pinned)");
    }
    description
}

fn file_history_id(subject: &EditorSubject) -> String {
    let repo_id = repository_id(&subject.repo_path);
    match &subject.sha {
        Some(sha) => format!("{repo_id}:history:file({}):{sha}", subject.path),
        None => format!("{repo_id}:history:file({})", subject.path),
    }
}

fn line_history_id(subject: &EditorSubject, range: &LineRange) -> String {
    format!(
        "{}:history:line({}:{}-{})",
        repository_id(&subject.repo_path),
        subject.path,
        range.start,
        range.end
    )
}

pub(super) fn tracker_children(node: &NodeRef, data: &HistoryTrackerNode) -> ViewResult<Vec<NodeRef>> {
    let ctx = node.context();
    if let Some(child) = node.cached_children().and_then(|c| c.into_iter().next()) {
        return child.children();
    }

    let subject = data.latest.borrow().clone();
    data.current.replace(subject.clone());
    let Some(subject) = subject else {
        ctx.set_description(None);
        ctx.set_message(Some(data.mode.no_editor_message().to_string()));
        return Ok(Vec::new());
    };
    ctx.set_description(Some(subject_description(&subject, data.following.get())));

    let child = match data.mode {
        HistoryMode::File => node.child(
            file_history_id(&subject),
            NodeKind::FileHistory(FileHistoryNode {
                subject,
                paging: RefCell::new(PagingState::default()),
            }),
        ),
        HistoryMode::Line => {
            let Some(range) = subject.selection else {
                ctx.set_message(Some(
                    "There was no selection provided for line history.".to_string(),
                ));
                return Ok(Vec::new());
            };
            node.child(
                line_history_id(&subject, &range),
                NodeKind::LineHistory(LineHistoryNode {
                    subject,
                    range,
                    paging: RefCell::new(PagingState::default()),
                }),
            )
        }
    };
    ctx.set_message(None);
    node.store_children(vec![child.clone()]);
    child.children()
}

pub(super) fn tracker_tree_item(node: &NodeRef, data: &HistoryTrackerNode) -> TreeItem {
    let mut context = String::from("viewtree:history-tracker");
    if !data.following.get() {
        context.push_str("+pinned");
    }
    let mut item = TreeItem::new(node.id(), data.mode.title(), Collapsible::Expanded).context(context);
    if let Some(subject) = data.current.borrow().as_ref() {
        item = item.description(subject_description(subject, data.following.get()));
    }
    item
}

/// Rebuilds the child only when the tracked subject changed, or on reset
pub(super) fn tracker_refresh(
    node: &NodeRef,
    data: &HistoryTrackerNode,
    reset: bool,
) -> ViewResult<RefreshOutcome> {
    let unchanged = *data.latest.borrow() == *data.current.borrow();
    if unchanged && !reset && node.cached_children().is_some() {
        debug!(id = node.id(), "history subject unchanged");
        return Ok(RefreshOutcome::Unchanged);
    }
    node.discard_children();
    Ok(RefreshOutcome::Changed)
}

pub(super) fn tracker_on_change(data: &HistoryTrackerNode, event: &ChangeEvent, now: Instant) {
    let ChangeEvent::ActiveEditor(event) = event else {
        return;
    };
    if event.pending || !data.following.get() {
        return;
    }
    let subject = event.subject.clone().map(|s| data.mode.normalize(s));
    data.debouncer.borrow_mut().push(subject, now);
}

pub(super) fn tracker_on_tick(node: &NodeRef, data: &HistoryTrackerNode, now: Instant) -> ViewResult<()> {
    let Some(subject) = data.debouncer.borrow_mut().poll(now) else {
        return Ok(());
    };
    debug!(id = node.id(), subject = ?subject, "active editor settled");
    data.latest.replace(subject);
    node.context().refresh_node(node, false, false)
}

/// Stops or resumes following the active editor
pub(crate) fn set_editor_following(node: &NodeRef, enabled: bool) {
    let NodeKind::HistoryTracker(data) = node.kind() else {
        return;
    };
    data.following.set(enabled);
    if !enabled {
        data.debouncer.borrow_mut().cancel();
    }
    node.ensure_subscription();
    if let Some(subject) = data.current.borrow().as_ref() {
        node.context()
            .set_description(Some(subject_description(subject, enabled)));
    }
    node.context().trigger_node_change(Some(node));
}

/// Points the tracker at `subject` directly, bypassing the debounce window
pub(crate) fn set_tracker_subject(node: &NodeRef, subject: Option<EditorSubject>) -> ViewResult<()> {
    let NodeKind::HistoryTracker(data) = node.kind() else {
        return Ok(());
    };
    data.debouncer.borrow_mut().cancel();
    data.latest.replace(subject.map(|s| data.mode.normalize(s)));
    node.context().refresh_node(node, false, false)
}

pub(crate) fn tracker_subject(node: &NodeRef) -> Option<EditorSubject> {
    match node.kind() {
        NodeKind::HistoryTracker(data) => data.current.borrow().clone(),
        _ => None,
    }
}

pub(super) fn file_log_query(node: &ViewNode, data: &FileHistoryNode, limit: Option<usize>) -> LogQuery {
    history_query(node, &data.subject, limit)
}

pub(super) fn line_log_query(node: &ViewNode, data: &LineHistoryNode, limit: Option<usize>) -> LogQuery {
    history_query(node, &data.subject, limit).lines(data.range)
}

fn history_query(node: &ViewNode, subject: &EditorSubject, limit: Option<usize>) -> LogQuery {
    let limit = limit.unwrap_or(node.context().config().default_item_limit);
    let mut query = LogQuery::new(&subject.repo_path).path(&subject.path).limit(limit);
    if let Some(sha) = &subject.sha {
        query = query.reference(sha);
    }
    query
}

pub(super) fn file_children(node: &NodeRef, data: &FileHistoryNode) -> ViewResult<Vec<NodeRef>> {
    history_children(node, &data.subject, "No file history could be found.")
}

pub(super) fn line_children(node: &NodeRef, data: &LineHistoryNode) -> ViewResult<Vec<NodeRef>> {
    history_children(node, &data.subject, "No line history could be found.")
}

/// Working-tree pseudo commits first, then the paged log
fn history_children(node: &NodeRef, subject: &EditorSubject, empty: &str) -> ViewResult<Vec<NodeRef>> {
    if let Some(children) = node.cached_children() {
        return Ok(children);
    }
    let ctx = node.context();

    let mut children = Vec::new();
    if subject.sha.is_none() && !subject.folder {
        let now = Utc::now();
        for status in ctx.git().get_status_for_path(&subject.repo_path, &subject.path)? {
            children.push(commit_node(node, Commit::uncommitted(&status, now)));
        }
    }

    let log = node.ensure_log()?;
    if let Some(log) = &log {
        children.extend(log.entries.iter().map(|commit| commit_node(node, commit.clone())));
    }
    if children.is_empty() {
        return Ok(vec![message(node, empty)]);
    }
    if log.is_some_and(|log| log.has_more) {
        children.push(load_more(node));
    }
    Ok(node.store_children(children))
}

pub(super) fn file_tree_item(node: &NodeRef, data: &FileHistoryNode) -> TreeItem {
    let subject = &data.subject;
    let name = subject.path.rsplit('/').next().unwrap_or(&subject.path);
    let context = if subject.folder {
        "viewtree:history:folder"
    } else {
        "viewtree:history:file"
    };
    TreeItem::new(node.id(), name, Collapsible::Expanded)
        .description(subject_directory(subject))
        .tooltip(format!("History of {}", subject.path))
        .context(context)
}

pub(super) fn line_tree_item(node: &NodeRef, data: &LineHistoryNode) -> TreeItem {
    let subject = &data.subject;
    let name = subject.path.rsplit('/').next().unwrap_or(&subject.path);
    TreeItem::new(node.id(), format!("{name}{}", data.range), Collapsible::Expanded)
        .description(subject_directory(subject))
        .tooltip(format!("History of {}{}", subject.path, data.range))
        .context("viewtree:history:line")
}

fn subject_directory(subject: &EditorSubject) -> &str {
    subject
        .path
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or_default()
}

pub(super) fn history_on_change(node: &NodeRef, subject: &EditorSubject, event: &ChangeEvent) -> ViewResult<()> {
    let ctx = node.context();
    let relevant = match event {
        ChangeEvent::Repository(e) => {
            e.repo_path == subject.repo_path && e.changed(HISTORY_CHANGES, ctx.config().change_comparison)
        }
        ChangeEvent::FileSystem(e) => {
            e.repo_path == subject.repo_path
                && if subject.folder {
                    e.touches_folder(&subject.path)
                } else {
                    e.touches_file(&subject.path)
                }
        }
        ChangeEvent::ActiveEditor(_) => false,
    };
    if !relevant {
        return Ok(());
    }
    debug!(id = node.id(), "triggering node refresh");
    ctx.refresh_node(node, true, false)
}
