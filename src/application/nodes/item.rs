//! What the host renders for a node

/// Expansion state of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Collapsible {
    /// Leaf row
    #[default]
    None,
    Collapsed,
    Expanded,
}

/// Action attached to a row, executed by the host's command layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCommand {
    /// Load the next page of the pageable node `node_id`
    LoadMore { node_id: String },
    OpenCommit { repo_path: String, sha: String },
    OpenFile {
        repo_path: String,
        path: String,
        sha: Option<String>,
    },
}

/// A rendered row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeItem {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub collapsible: Collapsible,
    /// `viewtree:<kind>` plus `+flag` suffixes for menus
    pub context_value: String,
    pub command: Option<NodeCommand>,
}

impl TreeItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, collapsible: Collapsible) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            collapsible,
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn context(mut self, context_value: impl Into<String>) -> Self {
        self.context_value = context_value.into();
        self
    }

    pub fn command(mut self, command: NodeCommand) -> Self {
        self.command = Some(command);
        self
    }
}
