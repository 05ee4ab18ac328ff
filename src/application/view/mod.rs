//! The tree controller
//!
//! A [`ViewTree`] owns one view's root node and answers the host's pull
//! requests (`get_children`, `get_tree_item`, `get_parent`). It also owns
//! the per-node page-size memory, drives timers through [`ViewTree::tick_at`]
//! and implements search, reveal and paging on behalf of commands.

mod commits;
mod context;
mod find;
mod history;
mod search_compare;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, error, trace, warn};

use crate::application::events::ChangeHub;
use crate::application::nodes::{self, NodeKind, NodeRef, TreeItem};
use crate::application::pins::PinStore;
use crate::config::ViewsConfig;
use crate::domain::entities::PageRequest;
use crate::domain::ports::{RepositoryService, RevealOptions, StateStore, TreeHost};
use crate::domain::value_objects::ViewKind;
use crate::error::{ViewError, ViewResult};

pub use context::ViewContext;
pub use find::FindOptions;

/// Collaborators a view is built from
#[derive(Clone)]
pub struct ViewServices {
    pub git: Rc<dyn RepositoryService>,
    pub host: Rc<dyn TreeHost>,
    pub hub: Rc<ChangeHub>,
    /// Workspace state; without it nothing can be pinned
    pub state: Option<Rc<dyn StateStore>>,
}

pub struct ViewTree {
    ctx: Rc<ViewContext>,
    root: RefCell<Option<NodeRef>>,
}

impl ViewTree {
    pub fn new(view: ViewKind, config: ViewsConfig, services: ViewServices) -> Self {
        let pins = services.state.map(PinStore::new);
        let ctx = ViewContext::new(view, config, services.git, services.host, services.hub, pins);
        Self {
            ctx: Rc::new(ctx),
            root: RefCell::new(None),
        }
    }

    pub fn view(&self) -> ViewKind {
        self.ctx.view()
    }

    pub fn context(&self) -> &Rc<ViewContext> {
        &self.ctx
    }

    /// Root node, created on first use. `force` rebuilds it.
    pub fn ensure_root(&self, force: bool) -> NodeRef {
        if !force {
            if let Some(root) = self.root.borrow().as_ref() {
                return Rc::clone(root);
            }
        }
        if let Some(previous) = self.root.borrow_mut().take() {
            previous.dispose();
        }
        let root = nodes::create_root(&self.ctx);
        debug!(view = self.view().id(), id = root.id(), "root created");
        self.root.replace(Some(Rc::clone(&root)));
        root
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root.borrow().clone()
    }

    /// Children of `node`, or the top-level rows when `None`
    pub fn get_children(&self, node: Option<&NodeRef>) -> ViewResult<Vec<NodeRef>> {
        match node {
            Some(node) => node.children(),
            None => self.ensure_root(false).children(),
        }
    }

    /// Parent as the host sees it: splatted ancestors are skipped and
    /// top-level rows have none
    pub fn get_parent(&self, node: &NodeRef) -> Option<NodeRef> {
        let mut parent = node.parent()?;
        while parent.is_splatted() {
            parent = parent.parent()?;
        }
        parent.parent().map(|_| parent)
    }

    pub fn get_tree_item(&self, node: &NodeRef) -> ViewResult<TreeItem> {
        node.tree_item()
    }

    /// Refreshes the whole view
    pub fn refresh(&self, reset: bool) -> ViewResult<()> {
        let root = self.ensure_root(false);
        root.refresh(reset)?;
        self.ctx.trigger_node_change(None);
        Ok(())
    }

    pub fn refresh_node(&self, node: &NodeRef, reset: bool, force: bool) -> ViewResult<()> {
        self.ctx.refresh_node(node, reset, force)
    }

    pub fn trigger_node_change(&self, node: Option<&NodeRef>) {
        self.ctx.trigger_node_change(node);
    }

    /// Asks the host to show `node`
    pub fn reveal(&self, node: &NodeRef, options: RevealOptions) -> ViewResult<()> {
        self.ctx.host().reveal(node.id(), &options)?;
        Ok(())
    }

    /// Reveals every visible ancestor of `node` from the top down.
    ///
    /// Failures are logged and skipped.
    pub fn ensure_reveal_node(&self, node: &NodeRef) {
        let mut ancestors = Vec::new();
        let mut current = node.parent();
        while let Some(ancestor) = current {
            current = ancestor.parent();
            ancestors.push(ancestor);
        }
        if ancestors.len() > 1 {
            ancestors.pop();
        }

        let options = RevealOptions::default();
        for ancestor in ancestors.into_iter().rev() {
            if ancestor.is_splatted() {
                trace!(id = ancestor.id(), "skipping splatted ancestor");
                continue;
            }
            if let Err(err) = self.reveal(&ancestor, options) {
                warn!(id = ancestor.id(), %err, "failed to reveal ancestor");
            }
        }
    }

    /// Loads more children of a pageable `node` and remembers the page size.
    ///
    /// `previous` is revealed first so the row the user clicked near stays
    /// in view.
    pub fn load_more_node_children(
        &self,
        node: &NodeRef,
        request: Option<PageRequest>,
        previous: Option<&NodeRef>,
    ) -> ViewResult<bool> {
        if !node.is_pageable() {
            return Err(ViewError::InvalidArgument(format!(
                "{} cannot load more children",
                node.id()
            )));
        }
        if let Some(previous) = previous {
            if let Err(err) = self.reveal(previous, RevealOptions::selected()) {
                warn!(id = previous.id(), %err, "failed to reveal previous node");
            }
        }

        let loaded = node.load_more(request)?;
        if let Some(limit) = node.limit() {
            self.ctx.set_last_known_limit(node.id(), limit);
        }
        Ok(loaded)
    }

    /// Executes a "load more" row: pages its parent, keeping the last loaded row in view
    pub fn activate_load_more(&self, load_more: &NodeRef) -> ViewResult<bool> {
        if !matches!(load_more.kind(), NodeKind::LoadMore(_)) {
            return Err(ViewError::InvalidArgument(format!(
                "{} is not a load-more row",
                load_more.id()
            )));
        }
        let parent = load_more.parent().ok_or_else(|| ViewError::NodeDisposed {
            id: load_more.id().to_string(),
        })?;

        let previous = parent.cached_children().and_then(|children| {
            let index = children.iter().position(|c| Rc::ptr_eq(c, load_more))?;
            index.checked_sub(1).and_then(|i| children.get(i).cloned())
        });
        self.load_more_node_children(&parent, None, previous.as_ref())
    }

    pub fn node_last_known_limit(&self, node: &NodeRef) -> Option<usize> {
        self.ctx.last_known_limit(node.id())
    }

    pub fn reset_node_last_known_limit(&self, node: &NodeRef) {
        self.ctx.reset_last_known_limit(node.id());
    }

    /// Subscribes realized nodes when the view is shown and drops every
    /// subscription when it is hidden
    pub fn set_visible(&self, visible: bool) {
        if self.ctx.is_visible() == visible {
            return;
        }
        self.ctx.set_visible(visible);
        debug!(view = self.view().id(), visible, "visibility changed");

        for node in self.realized_nodes() {
            if !visible {
                node.unsubscribe();
                continue;
            }
            if node.requires_reset_on_visible() {
                if let Err(err) = self.ctx.refresh_node(&node, true, false) {
                    error!(id = node.id(), %err, "failed to reset node");
                }
            }
            if !node.is_disposed() {
                node.ensure_subscription();
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.ctx.is_visible()
    }

    pub fn tick(&self) {
        self.tick_at(Instant::now());
    }

    /// Fires due refresh timers and settled debounces
    pub fn tick_at(&self, now: Instant) {
        for node in self.realized_nodes() {
            if let Err(err) = node.on_tick(now) {
                error!(id = node.id(), %err, "timer tick failed");
            }
        }
    }

    /// Every node currently memoized below the root, root first
    pub fn realized_nodes(&self) -> Vec<NodeRef> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Some(children) = node.cached_children() {
                stack.extend(children.into_iter().rev());
            }
            nodes.push(node);
        }
        nodes
    }

    pub fn message(&self) -> Option<String> {
        self.ctx.message()
    }

    pub fn description(&self) -> Option<String> {
        self.ctx.description()
    }

    pub fn dispose(&self) {
        if let Some(root) = self.root.borrow_mut().take() {
            root.dispose();
        }
    }
}

impl Drop for ViewTree {
    fn drop(&mut self) {
        self.dispose();
    }
}
