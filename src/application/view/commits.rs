//! Commits view: locating a commit on the current branch and revealing it

use tracing::{debug, warn};

use crate::application::nodes::{NodeKind, NodeRef};
use crate::domain::entities::PageRequest;
use crate::domain::ports::RevealOptions;
use crate::domain::value_objects::{CancellationToken, ViewKind};
use crate::error::ViewResult;

use super::{FindOptions, ViewTree};

impl ViewTree {
    /// Commit node for `sha` on the current branch of `repo_path`.
    ///
    /// Only the branch known to contain the commit is searched, and its log
    /// is extended up to the commit before the search looks at it.
    pub fn find_commit(
        &self,
        repo_path: &str,
        sha: &str,
        token: Option<&CancellationToken>,
    ) -> ViewResult<Option<NodeRef>> {
        if self.view() != ViewKind::Commits {
            warn!(view = self.view().id(), "commits can only be found in the commits view");
            return Ok(None);
        }
        if token.is_some_and(CancellationToken::is_cancelled) {
            return Ok(None);
        }

        let git = self.context().git();
        let Some(branch) = git.get_branch(repo_path)? else {
            return Ok(None);
        };
        if !git.branch_contains_commit(repo_path, &branch.name, sha)? {
            debug!(sha, branch = %branch.name, "commit is not on the current branch");
            return Ok(None);
        }

        let repo_id = crate::application::nodes::repository_id(repo_path);
        let can_traverse = |node: &NodeRef| -> ViewResult<bool> {
            let is_root = matches!(node.kind(), NodeKind::ViewRoot);
            if !is_root && !matches!(node.kind(), NodeKind::Repository(_)) {
                return Ok(false);
            }
            if !is_root && !node.id().starts_with(&repo_id) {
                return Ok(false);
            }

            let mut current = node.clone();
            while let Some(child) = current.splatted_child()? {
                current = child;
            }
            if let NodeKind::Branch(_) = current.kind() {
                if !current.id().starts_with(&repo_id) {
                    return Ok(false);
                }
                self.load_more_node_children(&current, Some(PageRequest::Until(sha.to_string())), None)?;
            }
            Ok(true)
        };

        let options = FindOptions {
            allow_paging: true,
            can_traverse: Some(&can_traverse),
            max_depth: Some(2),
            token,
        };
        Ok(self.find_node(|node| node.commit_sha() == Some(sha), options))
    }

    /// Finds the commit and reveals it with its ancestors
    pub fn reveal_commit(
        &self,
        repo_path: &str,
        sha: &str,
        options: RevealOptions,
        token: Option<&CancellationToken>,
    ) -> ViewResult<Option<NodeRef>> {
        let Some(node) = self.find_commit(repo_path, sha, token)? else {
            return Ok(None);
        };
        self.ensure_reveal_node(&node);
        self.reveal(&node, options)?;
        Ok(Some(node))
    }
}
