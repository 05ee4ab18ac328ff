use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::ports::{StateResult, StateStore};

/// In-memory workspace state that counts its writes
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: RefCell<BTreeMap<String, Value>>,
    writes: Cell<usize>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.values.borrow_mut().insert(key.to_string(), value);
        self
    }

    /// Number of `update` calls so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn update(&self, key: &str, value: Option<Value>) -> StateResult<()> {
        self.writes.set(self.writes.get() + 1);
        let mut values = self.values.borrow_mut();
        match value {
            Some(value) => {
                values.insert(key.to_string(), value);
            }
            None => {
                values.remove(key);
            }
        }
        Ok(())
    }
}
