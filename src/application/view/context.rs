//! State shared by every node of one view

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::application::events::ChangeHub;
use crate::application::nodes::{NodeRef, RefreshOutcome};
use crate::application::pins::PinStore;
use crate::config::ViewsConfig;
use crate::domain::ports::{RepositoryService, TreeHost};
use crate::domain::value_objects::ViewKind;
use crate::error::ViewResult;

/// Services and per-view state handed to every node.
///
/// Nodes never mutate the page-size memory directly; they read it when
/// they are created and the tree records it after a successful page load.
pub struct ViewContext {
    view: ViewKind,
    config: ViewsConfig,
    git: Rc<dyn RepositoryService>,
    host: Rc<dyn TreeHost>,
    hub: Rc<ChangeHub>,
    pins: Option<PinStore>,
    visible: Cell<bool>,
    last_known_limits: RefCell<HashMap<String, usize>>,
    message: RefCell<Option<String>>,
    description: RefCell<Option<String>>,
}

impl ViewContext {
    pub(crate) fn new(
        view: ViewKind,
        config: ViewsConfig,
        git: Rc<dyn RepositoryService>,
        host: Rc<dyn TreeHost>,
        hub: Rc<ChangeHub>,
        pins: Option<PinStore>,
    ) -> Self {
        Self {
            view,
            config,
            git,
            host,
            hub,
            pins,
            visible: Cell::new(true),
            last_known_limits: RefCell::new(HashMap::new()),
            message: RefCell::new(None),
            description: RefCell::new(None),
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn config(&self) -> &ViewsConfig {
        &self.config
    }

    pub fn git(&self) -> &dyn RepositoryService {
        self.git.as_ref()
    }

    pub(crate) fn host(&self) -> &dyn TreeHost {
        self.host.as_ref()
    }

    pub fn hub(&self) -> &Rc<ChangeHub> {
        &self.hub
    }

    pub fn pins(&self) -> Option<&PinStore> {
        self.pins.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    pub fn last_known_limit(&self, id: &str) -> Option<usize> {
        self.last_known_limits.borrow().get(id).copied()
    }

    pub(crate) fn set_last_known_limit(&self, id: &str, limit: usize) {
        self.last_known_limits
            .borrow_mut()
            .insert(id.to_string(), limit);
    }

    pub(crate) fn reset_last_known_limit(&self, id: &str) {
        self.last_known_limits.borrow_mut().remove(id);
    }

    /// Message shown instead of the tree, e.g. when nothing can be listed
    pub fn message(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    pub(crate) fn set_message(&self, message: Option<String>) {
        self.message.replace(message);
    }

    /// Text shown next to the view title
    pub fn description(&self) -> Option<String> {
        self.description.borrow().clone()
    }

    pub(crate) fn set_description(&self, description: Option<String>) {
        self.description.replace(description);
    }

    /// Tells the host to re-query `node`.
    ///
    /// A splatted node has no row of its own, so the notification goes to the
    /// nearest ancestor that does. Reaching the root means the whole tree.
    pub fn trigger_node_change(&self, node: Option<&NodeRef>) {
        let Some(node) = node else {
            trace!(view = self.view.id(), "tree changed");
            self.host.did_change_tree_data(None);
            return;
        };

        let mut target = Rc::clone(node);
        while target.is_splatted() {
            match target.parent() {
                Some(parent) => target = parent,
                None => break,
            }
        }

        if target.parent().is_none() {
            trace!(view = self.view.id(), from = node.id(), "tree changed");
            self.host.did_change_tree_data(None);
        } else {
            trace!(id = target.id(), from = node.id(), "node changed");
            self.host.did_change_tree_data(Some(target.id()));
        }
    }

    /// Refreshes `node` and notifies the host unless nothing changed.
    /// `force` notifies regardless.
    pub fn refresh_node(&self, node: &NodeRef, reset: bool, force: bool) -> ViewResult<()> {
        let outcome = node.refresh(reset)?;
        if outcome == RefreshOutcome::Unchanged && !force {
            debug!(id = node.id(), "refresh skipped notification");
            return Ok(());
        }
        self.trigger_node_change(Some(node));
        Ok(())
    }
}
