//! Commands of the file and line history views

use crate::application::nodes::{self, NodeKind, NodeRef};
use crate::domain::value_objects::EditorSubject;
use crate::error::{ViewError, ViewResult};

use super::ViewTree;

impl ViewTree {
    fn tracker(&self) -> ViewResult<NodeRef> {
        let root = self.ensure_root(false);
        if !matches!(root.kind(), NodeKind::HistoryTracker(_)) {
            return Err(ViewError::InvalidArgument(format!(
                "the {} view does not follow the editor",
                self.view().id()
            )));
        }
        Ok(root)
    }

    /// Pins the current subject (`false`) or resumes following the editor
    pub fn set_editor_following(&self, enabled: bool) -> ViewResult<()> {
        let tracker = self.tracker()?;
        nodes::set_editor_following(&tracker, enabled);
        Ok(())
    }

    pub fn is_following_editor(&self) -> bool {
        self.root().is_some_and(|root| match root.kind() {
            NodeKind::HistoryTracker(t) => t.is_following(),
            _ => false,
        })
    }

    /// Shows the history of `subject` right away, without waiting for the
    /// editor debounce
    pub fn track(&self, subject: Option<EditorSubject>) -> ViewResult<()> {
        let tracker = self.tracker()?;
        nodes::set_tracker_subject(&tracker, subject)
    }

    /// Subject whose history is currently shown
    pub fn tracked_subject(&self) -> Option<EditorSubject> {
        self.root().and_then(|root| nodes::tracker_subject(&root))
    }
}
