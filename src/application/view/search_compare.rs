//! Commands of the search-and-compare view

use tracing::warn;

use crate::application::nodes::{self, NodeRef};
use crate::domain::entities::{NamedRef, PinnedItem, SearchLabels, SearchPattern};
use crate::domain::ports::RevealOptions;
use crate::domain::value_objects::ViewKind;
use crate::error::{ViewError, ViewResult};

use super::{FindOptions, ViewTree};

impl ViewTree {
    fn results_root(&self) -> ViewResult<NodeRef> {
        if self.view() != ViewKind::SearchAndCompare {
            return Err(ViewError::InvalidArgument(format!(
                "the {} view has no search or compare results",
                self.view().id()
            )));
        }
        Ok(self.ensure_root(false))
    }

    /// Adds a comparison of `ref1` against `ref2` and reveals it expanded
    pub fn compare(&self, repo_path: &str, ref1: NamedRef, ref2: NamedRef) -> ViewResult<NodeRef> {
        let root = self.results_root()?;
        let node = nodes::compare_node(&root, repo_path, ref1, ref2, None, None);
        self.add_and_reveal(&root, node)
    }

    /// Adds a commit search. Labels are derived from the pattern when not given.
    pub fn search(
        &self,
        repo_path: &str,
        search: SearchPattern,
        labels: Option<SearchLabels>,
    ) -> ViewResult<NodeRef> {
        let root = self.results_root()?;
        let labels = labels.unwrap_or_else(|| SearchLabels {
            label: format!("Results for \"{}\"", search.pattern),
            query_label: format!("message: {}", search.pattern),
        });
        let node = nodes::search_node(&root, repo_path, search, labels, None);
        self.add_and_reveal(&root, node)
    }

    fn add_and_reveal(&self, root: &NodeRef, node: NodeRef) -> ViewResult<NodeRef> {
        let node = nodes::add_result(root, node, self.keep_results())?;
        let options = RevealOptions {
            select: true,
            focus: false,
            expand: 1,
        };
        if let Err(err) = self.reveal(&node, options) {
            warn!(id = node.id(), %err, "failed to reveal new result");
        }
        Ok(node)
    }

    pub fn pin(&self, node: &NodeRef) -> ViewResult<()> {
        nodes::set_pinned(node, true)
    }

    pub fn unpin(&self, node: &NodeRef) -> ViewResult<()> {
        nodes::set_pinned(node, false)
    }

    /// Unpins by pin id, whether or not the result is currently shown.
    /// Returns whether such a pin existed.
    pub fn unpin_by_id(&self, pin_id: &str) -> ViewResult<bool> {
        let root = self.results_root()?;
        let Some(pins) = self.context().pins() else {
            return Ok(false);
        };
        if !pins.is_pinned(pin_id)? {
            return Ok(false);
        }

        let shown = root
            .children()?
            .into_iter()
            .find(|node| nodes::pin_id(node).as_deref() == Some(pin_id));
        match shown {
            Some(node) => nodes::set_pinned(&node, false)?,
            None => {
                pins.update_pinned(pin_id, None)?;
                self.refresh_node(&root, false, true)?;
            }
        }
        Ok(true)
    }

    /// Removes one result; a pinned result is unpinned as well
    pub fn dismiss(&self, node_id: &str) -> ViewResult<bool> {
        let root = self.results_root()?;
        root.children()?;
        Ok(nodes::remove_results(&root, |node| node.id() == node_id)? > 0)
    }

    /// Removes every transient result. Pinned results stay.
    pub fn clear(&self) -> ViewResult<usize> {
        let root = self.results_root()?;
        nodes::remove_results(&root, |node| nodes::pinned_at(node).is_none())
    }

    /// Result node with the given id, searching only the top level
    pub fn find_result(&self, node_id: &str) -> Option<NodeRef> {
        self.find_node_by_id(node_id, FindOptions::default().max_depth(1))
    }

    pub fn keep_results(&self) -> bool {
        self.context()
            .pins()
            .map(|pins| pins.keep_results())
            .unwrap_or(true)
    }

    pub fn set_keep_results(&self, keep: bool) -> ViewResult<()> {
        let pins = self.context().pins().ok_or_else(|| {
            ViewError::InvalidArgument("keeping results requires workspace state".to_string())
        })?;
        pins.set_keep_results(keep)
    }

    /// Persisted pins, newest first
    pub fn pinned(&self) -> ViewResult<Vec<(String, PinnedItem)>> {
        match self.context().pins() {
            Some(pins) => pins.get_pinned(),
            None => Ok(Vec::new()),
        }
    }
}
