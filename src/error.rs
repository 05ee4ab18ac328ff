//! Error types for viewtree
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{HostError, RepositoryError, StateError};

/// Result type alias for tree operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Main error type for tree operations
#[derive(Error, Debug)]
pub enum ViewError {
    /// Repository service failed
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Workspace state could not be read or written
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Host refused a request
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Caller passed something the tree cannot act on
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation on a node after it was disposed
    #[error("node '{id}' has been disposed")]
    NodeDisposed { id: String },
}
