//! Domain Entities
//!
//! - `Branch` - local or remote branch with tracking state
//! - `Commit` - a log entry and the files it touched
//! - `PagedLog` - immutable page of a history query
//! - `PinnedItem` - persisted search or comparison

mod branch;
mod commit;
mod log;
mod pinned;
mod repository;

pub use branch::{Branch, TrackingState, Upstream};
pub use commit::{
    Commit, CommitFile, FileChangeKind, UNCOMMITTED_SHA, UNCOMMITTED_STAGED_SHA,
};
pub use log::{LogQuery, PageRequest, PagedLog};
pub use pinned::{
    comparison_pin_id, search_pin_id, DeprecatedPinnedComparison, NamedRef, PinnedItem,
    SearchLabels, SearchPattern,
};
pub use repository::{FileStatus, Remote, RepositoryInfo, Stash, StashEntry};
