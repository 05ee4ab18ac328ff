//! Tree nodes
//!
//! Every row in a view is an `Rc<ViewNode>`: a stable id, a kind-specific
//! payload, a weak link to its parent and interior state (memoized
//! children, splat flag, subscriptions). Behaviour that differs per kind
//! is dispatched on [`NodeKind`]; capabilities such as paging or change
//! subscriptions are answered by the kind rather than by a type hierarchy.
//!
//! Lifecycle: a node is created the first time its parent lists children,
//! memoizes its own children on first request, drops them again on refresh
//! and is disposed when its parent discards it. Disposal is recursive and
//! releases every subscription in the subtree.

mod branch;
mod branch_folder;
mod commit;
mod history;
mod item;
mod message;
mod paging;
mod repository;
mod results;
mod root;

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use tracing::{debug, error, trace};

use crate::application::events::{ChangeListener, RefreshTimer, Subscription, TimerTick, Topic};
use crate::application::gate::Gate;
use crate::application::view::ViewContext;
use crate::domain::value_objects::ChangeEvent;
use crate::error::{ViewError, ViewResult};

pub use branch::{BranchNode, BranchOptions, TrackingKind, TrackingStatusNode};
pub use branch_folder::{BranchFolderNode, RemoteNode};
pub use commit::{CommitNode, FileNode, FolderNode, StashNode};
pub use history::{FileHistoryNode, HistoryMode, HistoryTrackerNode, LineHistoryNode};
pub use item::{Collapsible, NodeCommand, TreeItem};
pub use message::{LoadMoreNode, MessageNode};
pub use paging::PagingState;
pub use repository::RepositoryNode;
pub use results::{CompareResultsNode, SearchResultsNode};

pub(crate) use history::{set_editor_following, set_tracker_subject, tracker_subject};
pub(crate) use repository::repository_id;
pub(crate) use results::{
    add_result, compare_node, pin_id, pinned_at, remove_results, search_node, set_pinned,
};
pub(crate) use root::create_root;

pub type NodeRef = Rc<ViewNode>;

/// The closed set of node kinds
pub enum NodeKind {
    ViewRoot,
    SearchAndCompareRoot,
    Repository(RepositoryNode),
    Branch(BranchNode),
    BranchFolder(BranchFolderNode),
    BranchTrackingStatus(TrackingStatusNode),
    Remote(RemoteNode),
    Commit(CommitNode),
    Stash(StashNode),
    Folder(FolderNode),
    File(FileNode),
    HistoryTracker(HistoryTrackerNode),
    FileHistory(FileHistoryNode),
    LineHistory(LineHistoryNode),
    CompareResults(CompareResultsNode),
    SearchResults(SearchResultsNode),
    Message(MessageNode),
    LoadMore(LoadMoreNode),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::ViewRoot => "view-root",
            NodeKind::SearchAndCompareRoot => "search-and-compare-root",
            NodeKind::Repository(_) => "repository",
            NodeKind::Branch(_) => "branch",
            NodeKind::BranchFolder(_) => "branch-folder",
            NodeKind::BranchTrackingStatus(_) => "status-branch",
            NodeKind::Remote(_) => "remote",
            NodeKind::Commit(_) => "commit",
            NodeKind::Stash(_) => "stash",
            NodeKind::Folder(_) => "folder",
            NodeKind::File(_) => "file",
            NodeKind::HistoryTracker(_) => "history-tracker",
            NodeKind::FileHistory(_) => "file-history",
            NodeKind::LineHistory(_) => "line-history",
            NodeKind::CompareResults(_) => "compare-results",
            NodeKind::SearchResults(_) => "search-results",
            NodeKind::Message(_) => "message",
            NodeKind::LoadMore(_) => "load-more",
        }
    }

    /// Kinds whose row is normally merged into their parent's position
    fn starts_splatted(&self) -> bool {
        match self {
            NodeKind::ViewRoot
            | NodeKind::Repository(_)
            | NodeKind::HistoryTracker(_)
            | NodeKind::FileHistory(_)
            | NodeKind::LineHistory(_) => true,
            NodeKind::Branch(b) => b.options.root,
            _ => false,
        }
    }
}

/// Result of [`ViewNode::refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Something may have changed; the host should re-query
    Changed,
    /// Nothing changed; the notification can be skipped
    Unchanged,
}

#[derive(Default)]
struct NodeState {
    children: Option<Vec<NodeRef>>,
    splatted: bool,
    disposed: bool,
    subscription: Option<NodeSubscription>,
    timer: Option<RefreshTimer>,
}

/// Keeps the listener alive for as long as its hub registrations exist
struct NodeSubscription {
    _listener: Rc<NodeListener>,
    _guards: Vec<Subscription>,
}

struct NodeListener {
    node: Weak<ViewNode>,
}

impl ChangeListener for NodeListener {
    fn on_change(&self, event: &ChangeEvent, now: Instant) {
        if let Some(node) = self.node.upgrade() {
            node.handle_change(event, now);
        }
    }
}

pub struct ViewNode {
    id: String,
    kind: NodeKind,
    parent: Weak<ViewNode>,
    ctx: Rc<ViewContext>,
    state: RefCell<NodeState>,
    gate: Gate,
}

impl std::fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewNode")
            .field("id", &self.id)
            .field("kind", &self.kind.name())
            .finish()
    }
}

impl ViewNode {
    pub(crate) fn new(
        ctx: &Rc<ViewContext>,
        parent: Option<&NodeRef>,
        id: String,
        kind: NodeKind,
    ) -> NodeRef {
        let state = NodeState {
            splatted: kind.starts_splatted(),
            ..NodeState::default()
        };
        let node = Rc::new(Self {
            id,
            kind,
            parent: parent.map(Rc::downgrade).unwrap_or_default(),
            ctx: Rc::clone(ctx),
            state: RefCell::new(state),
            gate: Gate::default(),
        });
        if let Some(paging) = node.paging() {
            paging.borrow_mut().limit = node.ctx.last_known_limit(&node.id);
        }
        trace!(id = %node.id, kind = node.kind.name(), "node created");
        node
    }

    /// Creates a child of `self` sharing its view context
    pub(crate) fn child(self: &Rc<Self>, id: String, kind: NodeKind) -> NodeRef {
        Self::new(&self.ctx, Some(self), id, kind)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    pub(crate) fn context(&self) -> &Rc<ViewContext> {
        &self.ctx
    }

    pub fn is_splatted(&self) -> bool {
        self.state.borrow().splatted
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().subscription.is_some()
    }

    /// Sha of the commit this node shows
    pub fn commit_sha(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Commit(c) => Some(&c.commit.sha),
            _ => None,
        }
    }

    /// Repository the node belongs to
    pub fn repo_path(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Repository(r) => Some(&r.repo.path),
            NodeKind::Branch(b) => Some(&b.branch.repo_path),
            NodeKind::BranchFolder(f) => Some(&f.repo_path),
            NodeKind::BranchTrackingStatus(t) => Some(&t.branch.repo_path),
            NodeKind::Remote(r) => Some(&r.remote.repo_path),
            NodeKind::Commit(c) => Some(&c.commit.repo_path),
            NodeKind::Stash(s) => Some(&s.entry.repo_path),
            NodeKind::Folder(f) => Some(&f.repo_path),
            NodeKind::File(f) => Some(&f.repo_path),
            NodeKind::FileHistory(h) => Some(&h.subject.repo_path),
            NodeKind::LineHistory(h) => Some(&h.subject.repo_path),
            NodeKind::CompareResults(c) => Some(&c.repo_path),
            NodeKind::SearchResults(s) => Some(&s.repo_path),
            _ => None,
        }
    }

    /// Children as the host should show them
    pub fn children(self: &Rc<Self>) -> ViewResult<Vec<NodeRef>> {
        if self.is_disposed() {
            return Err(ViewError::NodeDisposed {
                id: self.id.clone(),
            });
        }
        if self.is_subscribeable() {
            self.ensure_subscription();
        }

        match &self.kind {
            NodeKind::ViewRoot => root::children(self),
            NodeKind::SearchAndCompareRoot => results::root_children(self),
            NodeKind::Repository(r) => repository::children(self, r),
            NodeKind::Branch(b) => branch::children(self, b),
            NodeKind::BranchFolder(f) => branch_folder::folder_children(self, f),
            NodeKind::BranchTrackingStatus(t) => branch::tracking_children(self, t),
            NodeKind::Remote(r) => branch_folder::remote_children(self, r),
            NodeKind::Commit(c) => commit::commit_children(self, c),
            NodeKind::Stash(s) => commit::stash_children(self, s),
            NodeKind::Folder(f) => commit::folder_children(self, f),
            NodeKind::HistoryTracker(t) => history::tracker_children(self, t),
            NodeKind::FileHistory(h) => history::file_children(self, h),
            NodeKind::LineHistory(h) => history::line_children(self, h),
            NodeKind::CompareResults(c) => results::compare_children(self, c),
            NodeKind::SearchResults(s) => results::search_children(self, s),
            NodeKind::File(_) | NodeKind::Message(_) | NodeKind::LoadMore(_) => Ok(Vec::new()),
        }
    }

    /// The node's own row. Rendering a row means the node is no longer splatted.
    pub fn tree_item(self: &Rc<Self>) -> ViewResult<TreeItem> {
        let item = match &self.kind {
            NodeKind::ViewRoot => root::tree_item(self),
            NodeKind::SearchAndCompareRoot => results::root_tree_item(self),
            NodeKind::Repository(r) => repository::tree_item(self, r)?,
            NodeKind::Branch(b) => branch::tree_item(self, b),
            NodeKind::BranchFolder(f) => branch_folder::folder_tree_item(self, f),
            NodeKind::BranchTrackingStatus(t) => branch::tracking_tree_item(self, t),
            NodeKind::Remote(r) => branch_folder::remote_tree_item(self, r),
            NodeKind::Commit(c) => commit::commit_tree_item(self, c),
            NodeKind::Stash(s) => commit::stash_tree_item(self, s),
            NodeKind::Folder(f) => commit::folder_tree_item(self, f),
            NodeKind::File(f) => commit::file_tree_item(self, f),
            NodeKind::HistoryTracker(t) => history::tracker_tree_item(self, t),
            NodeKind::FileHistory(h) => history::file_tree_item(self, h),
            NodeKind::LineHistory(h) => history::line_tree_item(self, h),
            NodeKind::CompareResults(c) => results::compare_tree_item(self, c),
            NodeKind::SearchResults(s) => results::search_tree_item(self, s),
            NodeKind::Message(m) => message::message_tree_item(self, m),
            NodeKind::LoadMore(l) => message::load_more_tree_item(self, l),
        };

        self.state.borrow_mut().splatted = false;
        if self.is_subscribeable() {
            self.ensure_subscription();
        }
        Ok(item)
    }

    /// Invalidates cached state.
    ///
    /// `reset = false` keeps fetched data and only rebuilds child nodes;
    /// `reset = true` also forgets fetched logs so the next listing refetches.
    pub fn refresh(self: &Rc<Self>, reset: bool) -> ViewResult<RefreshOutcome> {
        if self.is_disposed() {
            return Ok(RefreshOutcome::Unchanged);
        }
        trace!(id = %self.id, reset, "refresh");

        match &self.kind {
            NodeKind::ViewRoot => root::refresh(self, reset),
            NodeKind::SearchAndCompareRoot => results::root_refresh(self, reset),
            NodeKind::HistoryTracker(t) => history::tracker_refresh(self, t, reset),
            NodeKind::Repository(_) => repository::refresh(self, reset),
            _ => {
                self.discard_children();
                if reset {
                    if let Some(paging) = self.paging() {
                        paging.borrow_mut().invalidate();
                    }
                }
                Ok(RefreshOutcome::Changed)
            }
        }
    }

    /// Child the node merges into when it is splatted
    pub(crate) fn splatted_child(self: &Rc<Self>) -> ViewResult<Option<NodeRef>> {
        let splats = match &self.kind {
            NodeKind::ViewRoot | NodeKind::HistoryTracker(_) => true,
            NodeKind::Repository(_) => repository::splats_into_branch(self),
            _ => false,
        };
        if !splats {
            return Ok(None);
        }

        if self.cached_children().is_none() {
            self.children()?;
        }
        Ok(self
            .cached_children()
            .filter(|children| children.len() == 1)
            .and_then(|mut children| children.pop()))
    }

    /// Releases subscriptions and disposes every memoized descendant
    pub fn dispose(&self) {
        let (children, subscription, timer) = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            (
                state.children.take(),
                state.subscription.take(),
                state.timer.take(),
            )
        };
        if subscription.is_some() {
            debug!(id = %self.id, "dropping subscription of disposed node");
        }
        drop(subscription);
        drop(timer);

        for child in children.into_iter().flatten() {
            child.dispose();
        }
    }

    pub(crate) fn cached_children(&self) -> Option<Vec<NodeRef>> {
        self.state.borrow().children.clone()
    }

    /// Memoizes `children` and hands them back
    pub(crate) fn store_children(&self, children: Vec<NodeRef>) -> Vec<NodeRef> {
        self.state.borrow_mut().children = Some(children.clone());
        children
    }

    /// Replaces memoized children without disposing the previous ones
    pub(crate) fn replace_children(&self, children: Vec<NodeRef>) {
        self.state.borrow_mut().children = Some(children);
    }

    /// Drops memoized children, disposing them
    pub(crate) fn discard_children(&self) {
        let children = self.state.borrow_mut().children.take();
        for child in children.into_iter().flatten() {
            child.dispose();
        }
    }

    fn is_subscribeable(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Repository(_)
                | NodeKind::HistoryTracker(_)
                | NodeKind::FileHistory(_)
                | NodeKind::LineHistory(_)
        )
    }

    fn can_subscribe(&self) -> bool {
        match &self.kind {
            NodeKind::HistoryTracker(t) => t.following.get(),
            _ => true,
        }
    }

    /// History nodes refetch when their view is shown again
    pub(crate) fn requires_reset_on_visible(&self) -> bool {
        matches!(self.kind, NodeKind::FileHistory(_) | NodeKind::LineHistory(_))
    }

    fn subscription_topics(&self) -> Vec<Topic> {
        match &self.kind {
            NodeKind::Repository(r) => vec![Topic::Repository(r.repo.path.clone())],
            NodeKind::HistoryTracker(_) => vec![Topic::ActiveEditor],
            NodeKind::FileHistory(h) => vec![
                Topic::Repository(h.subject.repo_path.clone()),
                Topic::FileSystem(h.subject.repo_path.clone()),
            ],
            NodeKind::LineHistory(h) => vec![
                Topic::Repository(h.subject.repo_path.clone()),
                Topic::FileSystem(h.subject.repo_path.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Subscribes when the node, its view and its policy all allow it;
    /// unsubscribes when they no longer do
    pub(crate) fn ensure_subscription(self: &Rc<Self>) {
        let wanted = self.is_subscribeable()
            && !self.is_disposed()
            && self.ctx.is_visible()
            && self.can_subscribe();
        if !wanted {
            self.unsubscribe();
            return;
        }
        if self.is_subscribed() {
            return;
        }

        let listener = Rc::new(NodeListener {
            node: Rc::downgrade(self),
        });
        let weak: Weak<NodeListener> = Rc::downgrade(&listener);
        let target: Weak<dyn ChangeListener> = weak;
        let guards = self
            .subscription_topics()
            .into_iter()
            .map(|topic| self.ctx.hub().subscribe(topic, target.clone()))
            .collect();

        let timer = match &self.kind {
            NodeKind::Repository(r) => repository::start_timer(self, r, Instant::now()),
            _ => None,
        };

        debug!(id = %self.id, "subscribed");
        let mut state = self.state.borrow_mut();
        state.subscription = Some(NodeSubscription {
            _listener: listener,
            _guards: guards,
        });
        state.timer = timer;
    }

    /// Starts the refresh timer over from the current last-fetched time
    pub(crate) fn restart_timer(self: &Rc<Self>, now: Instant) {
        if !self.is_subscribed() {
            return;
        }
        let timer = match &self.kind {
            NodeKind::Repository(r) => repository::start_timer(self, r, now),
            _ => None,
        };
        self.state.borrow_mut().timer = timer;
    }

    pub(crate) fn unsubscribe(&self) {
        let (subscription, timer) = {
            let mut state = self.state.borrow_mut();
            (state.subscription.take(), state.timer.take())
        };
        if subscription.is_some() {
            debug!(id = %self.id, "unsubscribed");
        }
        drop(subscription);
        drop(timer);
    }

    fn handle_change(self: &Rc<Self>, event: &ChangeEvent, now: Instant) {
        if self.is_disposed() {
            return;
        }
        let result = match &self.kind {
            NodeKind::Repository(r) => repository::on_change(self, r, event, now),
            NodeKind::HistoryTracker(t) => {
                history::tracker_on_change(t, event, now);
                Ok(())
            }
            NodeKind::FileHistory(h) => history::history_on_change(self, &h.subject, event),
            NodeKind::LineHistory(h) => history::history_on_change(self, &h.subject, event),
            _ => Ok(()),
        };
        if let Err(err) = result {
            error!(id = %self.id, %err, "failed to handle change event");
        }
    }

    /// Fires due timers and debounced events
    pub(crate) fn on_tick(self: &Rc<Self>, now: Instant) -> ViewResult<()> {
        if self.is_disposed() {
            return Ok(());
        }

        let due = self
            .state
            .borrow()
            .timer
            .as_ref()
            .is_some_and(|timer| timer.is_due(now));
        let tick = if due {
            let age = match &self.kind {
                NodeKind::Repository(r) => repository::last_fetched_age(self, r),
                _ => None,
            };
            self.state
                .borrow_mut()
                .timer
                .as_mut()
                .map(|timer| timer.poll(now, age))
        } else {
            None
        };
        if let Some(TimerTick::Fired { rescheduled }) = tick {
            debug!(id = %self.id, rescheduled, "refresh interval elapsed");
            self.ctx.trigger_node_change(Some(self));
        }

        if let NodeKind::HistoryTracker(t) = &self.kind {
            history::tracker_on_tick(self, t, now)?;
        }
        Ok(())
    }
}
