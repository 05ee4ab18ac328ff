//! Domain Services
//!
//! Pure logic with no I/O: hierarchy building, paging rules and
//! refresh-interval selection.

mod hierarchy;
mod paging;
mod refresh_interval;

pub use hierarchy::{compact_hierarchy, join_relative, make_hierarchical, HierarchicalItem};
pub use paging::widen_for_unpublished;
pub use refresh_interval::{describe_age, refresh_interval_for};
