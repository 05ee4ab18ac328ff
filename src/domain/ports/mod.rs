//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod repository_service;
pub mod state_store;
pub mod tree_host;

pub use repository_service::{RepositoryError, RepositoryResult, RepositoryService};
pub use state_store::{StateError, StateResult, StateStore};
pub use tree_host::{HostError, RevealOptions, TreeHost};
