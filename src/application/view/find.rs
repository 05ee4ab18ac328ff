//! Breadth-first node search with paging cooperation

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, error};

use crate::application::nodes::NodeRef;
use crate::domain::entities::PageRequest;
use crate::domain::value_objects::CancellationToken;
use crate::error::ViewResult;

use super::ViewTree;

/// Tuning for [`ViewTree::find_node`]
#[derive(Clone, Copy, Default)]
pub struct FindOptions<'a> {
    /// Load further pages of pageable nodes while looking for a match
    pub allow_paging: bool,
    /// Approves descending into a node; a rejected node's children are never fetched
    pub can_traverse: Option<&'a dyn Fn(&NodeRef) -> ViewResult<bool>>,
    /// Levels below the root to search; the configured default when `None`
    pub max_depth: Option<usize>,
    pub token: Option<&'a CancellationToken>,
}

impl<'a> FindOptions<'a> {
    pub fn with_paging(mut self) -> Self {
        self.allow_paging = true;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn token(mut self, token: &'a CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_some_and(CancellationToken::is_cancelled)
    }
}

impl ViewTree {
    /// First node matching `predicate`, or `None`.
    ///
    /// Not finding anything, cancellation and repository failures all end
    /// the search with `None`; failures are logged.
    pub fn find_node(
        &self,
        predicate: impl Fn(&NodeRef) -> bool,
        options: FindOptions<'_>,
    ) -> Option<NodeRef> {
        match self.find_node_bfs(&predicate, &options) {
            Ok(found) => found,
            Err(err) => {
                error!(view = self.view().id(), %err, "node search failed");
                None
            }
        }
    }

    pub fn find_node_by_id(&self, id: &str, options: FindOptions<'_>) -> Option<NodeRef> {
        self.find_node(|node| node.id() == id, options)
    }

    fn find_node_bfs(
        &self,
        predicate: &dyn Fn(&NodeRef) -> bool,
        options: &FindOptions<'_>,
    ) -> ViewResult<Option<NodeRef>> {
        let max_depth = options
            .max_depth
            .unwrap_or(self.context().config().find_max_depth);
        let page_size = self.context().config().max_list_items;

        // `None` marks the end of a level
        let mut queue: VecDeque<Option<NodeRef>> =
            VecDeque::from([Some(self.ensure_root(false)), None]);
        let mut depth = 0;

        while queue.len() > 1 {
            if options.is_cancelled() {
                debug!("node search cancelled");
                return Ok(None);
            }
            let Some(entry) = queue.pop_front() else {
                break;
            };
            let Some(node) = entry else {
                depth += 1;
                if depth > max_depth {
                    debug!(max_depth, "node search reached its depth limit");
                    break;
                }
                queue.push_back(None);
                continue;
            };

            if predicate(&node) {
                return Ok(Some(node));
            }
            if let Some(can_traverse) = options.can_traverse {
                if !can_traverse(&node)? {
                    continue;
                }
            }

            let children = node.children()?;
            if children.is_empty() {
                continue;
            }

            let mut pageable = Rc::clone(&node);
            while !pageable.is_pageable() {
                match pageable.splatted_child()? {
                    Some(child) => pageable = child,
                    None => break,
                }
            }
            if !pageable.is_pageable() {
                queue.extend(children.into_iter().map(Some));
                continue;
            }

            if let Some(found) = children.into_iter().find(|c| predicate(c)) {
                return Ok(Some(found));
            }
            if !options.allow_paging {
                continue;
            }
            while pageable.has_more() {
                if options.is_cancelled() {
                    debug!("node search cancelled while paging");
                    return Ok(None);
                }
                let loaded = self.load_more_node_children(
                    &pageable,
                    Some(PageRequest::Size(page_size)),
                    None,
                )?;
                if !loaded {
                    break;
                }
                if let Some(found) = pageable.children()?.into_iter().find(|c| predicate(c)) {
                    return Ok(Some(found));
                }
            }
        }

        Ok(None)
    }
}
