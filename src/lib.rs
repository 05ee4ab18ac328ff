//! Viewtree - lazy, paged Git tree views
//!
//! Models the sidebar views of a Git client as trees of lazily realized
//! nodes: commits, branches, remotes, stashes, file and line history, and
//! search and compare results. Nodes fetch their children on demand, page
//! long logs, follow repository and editor changes, and tell the host which
//! rows need repainting.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;

// Re-exports for convenience
pub use application::{FindOptions, NodeRef, TreeItem, ViewServices, ViewTree};
pub use config::ViewsConfig;
pub use domain::value_objects::{CancellationToken, ViewKind};
pub use error::{ViewError, ViewResult};
