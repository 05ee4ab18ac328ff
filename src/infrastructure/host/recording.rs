//! A TreeHost that remembers what it was told

use std::cell::RefCell;
use std::collections::HashSet;

use crate::domain::ports::{HostError, RevealOptions, TreeHost};

/// Records change notifications and reveal requests.
///
/// Ids registered with [`RecordingHost::fail_reveal`] are rejected, which
/// lets callers exercise best-effort reveal paths.
#[derive(Debug, Default)]
pub struct RecordingHost {
    changes: RefCell<Vec<Option<String>>>,
    reveals: RefCell<Vec<(String, RevealOptions)>>,
    failing: RefCell<HashSet<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reveal(&self, node_id: &str) {
        self.failing.borrow_mut().insert(node_id.to_string());
    }

    /// Changed node ids in order; `None` stands for the whole tree
    pub fn changes(&self) -> Vec<Option<String>> {
        self.changes.borrow().clone()
    }

    pub fn take_changes(&self) -> Vec<Option<String>> {
        self.changes.take()
    }

    /// Node ids that were revealed successfully, in order
    pub fn reveals(&self) -> Vec<(String, RevealOptions)> {
        self.reveals.borrow().clone()
    }

    pub fn revealed_ids(&self) -> Vec<String> {
        self.reveals.borrow().iter().map(|(id, _)| id.clone()).collect()
    }
}

impl TreeHost for RecordingHost {
    fn did_change_tree_data(&self, node_id: Option<&str>) {
        self.changes.borrow_mut().push(node_id.map(str::to_string));
    }

    fn reveal(&self, node_id: &str, options: &RevealOptions) -> Result<(), HostError> {
        if self.failing.borrow().contains(node_id) {
            return Err(HostError::UnknownNode(node_id.to_string()));
        }
        self.reveals
            .borrow_mut()
            .push((node_id.to_string(), *options));
        Ok(())
    }
}
