//! Application Layer
//!
//! The tree model built on the domain ports:
//!
//! - `nodes` - the closed set of node kinds and their lazy children
//! - `view` - `ViewTree`, the controller a host talks to
//! - `events` - change hub, debouncer and refresh timers
//! - `pins` - persisted search and compare pins
//! - `gate` - re-entrancy guard for paging

pub mod events;
pub mod gate;
pub mod nodes;
pub mod pins;
pub mod view;

pub use nodes::{Collapsible, NodeCommand, NodeKind, NodeRef, RefreshOutcome, TreeItem, ViewNode};
pub use pins::PinStore;
pub use view::{FindOptions, ViewContext, ViewServices, ViewTree};
