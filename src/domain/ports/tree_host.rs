//! TreeHost port - the UI that renders a tree
//!
//! The host pulls children and items from the tree on its own schedule.
//! The tree only tells it which node changed and asks it to reveal nodes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("node '{0}' is not known to the host")]
    UnknownNode(String),

    #[error("host rejected request: {0}")]
    Rejected(String),
}

/// How a node should be brought into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealOptions {
    pub select: bool,
    pub focus: bool,
    /// Number of levels to expand below the node
    pub expand: u8,
}

impl RevealOptions {
    pub fn selected() -> Self {
        Self {
            select: true,
            ..Self::default()
        }
    }
}

pub trait TreeHost {
    /// Re-query `node_id`'s item and children; `None` means the whole tree
    fn did_change_tree_data(&self, node_id: Option<&str>);

    fn reveal(&self, node_id: &str, options: &RevealOptions) -> Result<(), HostError>;
}
