//! In-process change event multiplexer
//!
//! The host publishes repository, file-system and active-editor events into
//! a [`ChangeHub`]; nodes register interest per [`Topic`] and hold the
//! returned [`Subscription`] guard for as long as they want to hear about
//! it. Listeners are held weakly, so the hub never keeps a node alive.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Instant;

use tracing::trace;

use crate::domain::value_objects::ChangeEvent;

/// Receives published events
pub trait ChangeListener {
    fn on_change(&self, event: &ChangeEvent, now: Instant);
}

/// What a subscription listens to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Repository change events for one repository
    Repository(String),
    /// File-system events under one repository
    FileSystem(String),
    /// Active editor and selection changes
    ActiveEditor,
}

impl Topic {
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match (self, event) {
            (Topic::Repository(path), ChangeEvent::Repository(e)) => *path == e.repo_path,
            (Topic::FileSystem(path), ChangeEvent::FileSystem(e)) => *path == e.repo_path,
            (Topic::ActiveEditor, ChangeEvent::ActiveEditor(_)) => true,
            _ => false,
        }
    }
}

struct Listener {
    topic: Topic,
    target: Weak<dyn ChangeListener>,
}

#[derive(Default)]
pub struct ChangeHub {
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<u64, Listener>>,
}

impl ChangeHub {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Registers `target` for `topic` until the returned guard is dropped
    pub fn subscribe(self: &Rc<Self>, topic: Topic, target: Weak<dyn ChangeListener>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        trace!(id, ?topic, "subscribe");
        self.listeners
            .borrow_mut()
            .insert(id, Listener { topic, target });
        Subscription {
            hub: Rc::downgrade(self),
            id,
        }
    }

    pub fn publish(&self, event: &ChangeEvent) -> usize {
        self.publish_at(event, Instant::now())
    }

    /// Delivers `event` to every live listener of a matching topic.
    ///
    /// Returns the number of listeners reached. Listeners may subscribe or
    /// unsubscribe while handling the event.
    pub fn publish_at(&self, event: &ChangeEvent, now: Instant) -> usize {
        let targets: Vec<Rc<dyn ChangeListener>> = self
            .listeners
            .borrow()
            .values()
            .filter(|l| l.topic.matches(event))
            .filter_map(|l| l.target.upgrade())
            .collect();

        for target in &targets {
            target.on_change(event, now);
        }
        targets.len()
    }

    /// Number of registered subscriptions
    pub fn live_subscriptions(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn unsubscribe(&self, id: u64) {
        trace!(id, "unsubscribe");
        self.listeners.borrow_mut().remove(&id);
    }
}

impl std::fmt::Debug for ChangeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeHub")
            .field("live_subscriptions", &self.live_subscriptions())
            .finish()
    }
}

/// RAII registration; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    hub: Weak<ChangeHub>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unsubscribe(self.id);
        }
    }
}
