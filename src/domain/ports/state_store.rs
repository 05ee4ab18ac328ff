//! StateStore port - per-workspace key/value persistence

use serde_json::Value;
use thiserror::Error;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read workspace state: {0}")]
    Read(String),

    #[error("failed to write workspace state: {0}")]
    Write(String),

    #[error("malformed value for '{key}': {message}")]
    Malformed { key: String, message: String },
}

/// JSON key/value store scoped to the workspace
pub trait StateStore {
    fn get(&self, key: &str) -> Option<Value>;

    /// Writes `value` under `key`; `None` deletes the key
    fn update(&self, key: &str, value: Option<Value>) -> StateResult<()>;
}
