//! Workspace state persisted as a JSON object file

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::ports::{StateError, StateResult, StateStore};

/// Keeps every key in one pretty-printed JSON object, rewritten on each update
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    values: RefCell<Map<String, Value>>,
}

impl JsonStateStore {
    /// Opens `path`, starting empty when the file does not exist yet
    pub fn open(path: &Path) -> StateResult<Self> {
        let values = if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|e| StateError::Read(e.to_string()))?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content)
                    .map_err(|e| StateError::Read(e.to_string()))?
                {
                    Value::Object(map) => map,
                    _ => {
                        return Err(StateError::Read(format!(
                            "{} does not contain a JSON object",
                            path.display()
                        )))
                    }
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values: RefCell::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StateError::Write(e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(&*self.values.borrow())
            .map_err(|e| StateError::Write(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| StateError::Write(e.to_string()))?;
        debug!(path = %self.path.display(), "workspace state written");
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn update(&self, key: &str, value: Option<Value>) -> StateResult<()> {
        {
            let mut values = self.values.borrow_mut();
            match value {
                Some(value) => {
                    values.insert(key.to_string(), value);
                }
                None => {
                    values.remove(key);
                }
            }
        }
        self.persist()
    }
}
