//! Paging capability shared by branch, history and result nodes
//!
//! A pageable node caches one [`PagedLog`] at a time. The cache is a
//! tri-state so "never fetched", "fetched but empty" and "thrown away by a
//! reset" stay distinct.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::domain::entities::{LogQuery, PageRequest, PagedLog};
use crate::error::ViewResult;

use super::{branch, history, results, NodeKind, ViewNode};

#[derive(Debug, Clone, Default)]
pub(crate) enum LogCache {
    #[default]
    NotFetched,
    /// `None` means the query has no history
    Fetched(Option<Rc<PagedLog>>),
    Invalidated,
}

/// Log cache plus the page size the node was last extended to
#[derive(Debug, Default)]
pub struct PagingState {
    pub(crate) log: LogCache,
    pub(crate) limit: Option<usize>,
}

impl PagingState {
    pub(crate) fn invalidate(&mut self) {
        self.log = LogCache::Invalidated;
    }
}

impl ViewNode {
    pub(crate) fn paging(&self) -> Option<&RefCell<PagingState>> {
        match &self.kind {
            NodeKind::Branch(b) => Some(&b.paging),
            NodeKind::FileHistory(h) => Some(&h.paging),
            NodeKind::LineHistory(h) => Some(&h.paging),
            NodeKind::CompareResults(c) => Some(&c.paging),
            NodeKind::SearchResults(s) => Some(&s.paging),
            _ => None,
        }
    }

    pub fn is_pageable(&self) -> bool {
        self.paging().is_some()
    }

    /// Whether another page may exist. Unknown until fetched, so an
    /// unfetched log counts as having more.
    pub fn has_more(&self) -> bool {
        let Some(paging) = self.paging() else {
            return false;
        };
        let has_more = match &paging.borrow().log {
            LogCache::Fetched(Some(log)) => log.has_more,
            LogCache::Fetched(None) => false,
            LogCache::NotFetched | LogCache::Invalidated => true,
        };
        has_more
    }

    /// Page size set by the last successful "load more"
    pub fn limit(&self) -> Option<usize> {
        self.paging().and_then(|p| p.borrow().limit)
    }

    /// Entries currently loaded
    pub fn loaded_count(&self) -> usize {
        let Some(paging) = self.paging() else {
            return 0;
        };
        let count = match &paging.borrow().log {
            LogCache::Fetched(Some(log)) => log.count(),
            _ => 0,
        };
        count
    }

    fn log_query(&self, limit: Option<usize>) -> Option<LogQuery> {
        match &self.kind {
            NodeKind::Branch(b) => Some(branch::log_query(self, b, limit)),
            NodeKind::FileHistory(h) => Some(history::file_log_query(self, h, limit)),
            NodeKind::LineHistory(h) => Some(history::line_log_query(self, h, limit)),
            NodeKind::CompareResults(c) => Some(results::compare_log_query(self, c, limit)),
            NodeKind::SearchResults(s) => Some(results::search_log_query(self, s, limit)),
            _ => None,
        }
    }

    /// Cached log, fetching the first page when needed
    pub(crate) fn ensure_log(&self) -> ViewResult<Option<Rc<PagedLog>>> {
        let Some(paging) = self.paging() else {
            return Ok(None);
        };
        if let LogCache::Fetched(log) = &paging.borrow().log {
            return Ok(log.clone());
        }

        let limit = paging.borrow().limit;
        let Some(query) = self.log_query(limit) else {
            return Ok(None);
        };
        debug!(id = %self.id, limit = query.limit, "fetching log");
        let log = self.ctx.git().get_log(&query)?;
        paging.borrow_mut().log = LogCache::Fetched(log.clone());
        Ok(log)
    }

    /// Extends the cached log by `request` (one default page when `None`).
    ///
    /// Returns whether anything new was loaded. A call made while another
    /// one is still running on the same node returns `false` immediately.
    pub fn load_more(self: &Rc<Self>, request: Option<PageRequest>) -> ViewResult<bool> {
        let Some(paging) = self.paging() else {
            return Ok(false);
        };
        let Some(_guard) = self.gate.enter() else {
            debug!(id = %self.id, "load more already in progress");
            return Ok(false);
        };

        let Some(log) = self.ensure_log()? else {
            return Ok(false);
        };
        if !log.has_more {
            return Ok(false);
        }

        let request =
            request.unwrap_or_else(|| PageRequest::Size(self.ctx.config().page_item_limit));
        let Some(next) = self.ctx.git().more_log(&log, &request)? else {
            return Ok(false);
        };
        if Rc::ptr_eq(&next, &log) {
            debug!(id = %self.id, ?request, "log did not grow");
            return Ok(false);
        }

        {
            let mut state = paging.borrow_mut();
            let current = matches!(&state.log, LogCache::Fetched(Some(cached)) if Rc::ptr_eq(cached, &log));
            if !current {
                debug!(id = %self.id, "discarding page fetched for a stale log");
                return Ok(false);
            }
            debug!(id = %self.id, from = log.count(), to = next.count(), "loaded more");
            state.limit = Some(next.count());
            state.log = LogCache::Fetched(Some(next));
        }

        self.discard_children();
        self.ctx.trigger_node_change(Some(self));
        Ok(true)
    }
}
