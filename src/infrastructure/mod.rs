//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//!
//! ## Structure
//!
//! - `repositories/` - RepositoryService over a JSON snapshot
//! - `state/` - StateStore backed by a JSON file or memory
//! - `host/` - TreeHost that records notifications and reveals

pub mod host;
pub mod repositories;
pub mod state;

pub use host::RecordingHost;
pub use repositories::FixtureRepositoryService;
pub use state::{JsonStateStore, MemoryStateStore};
