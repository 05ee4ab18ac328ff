//! Persisted pins for search and comparison results
//!
//! Pins live in workspace state under [`PINNED_ITEMS_KEY`] as a JSON map of
//! id to [`PinnedItem`]. Older workspaces stored comparisons only, without
//! a type tag, under [`DEPRECATED_PINNED_COMPARISONS_KEY`]; those are moved
//! over the first time pins are read.

use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::entities::{comparison_pin_id, DeprecatedPinnedComparison, PinnedItem};
use crate::domain::ports::{StateError, StateStore};
use crate::error::ViewResult;

pub const PINNED_ITEMS_KEY: &str = "views:searchAndCompare:pinned";
pub const DEPRECATED_PINNED_COMPARISONS_KEY: &str = "pinnedComparisons";
pub const KEEP_RESULTS_KEY: &str = "views:searchAndCompare:keepResults";

type PinnedMap = BTreeMap<String, PinnedItem>;

#[derive(Clone)]
pub struct PinStore {
    state: Rc<dyn StateStore>,
}

impl PinStore {
    pub fn new(state: Rc<dyn StateStore>) -> Self {
        Self { state }
    }

    /// Pinned items, newest first, migrating the deprecated shape on first read
    pub fn get_pinned(&self) -> ViewResult<Vec<(String, PinnedItem)>> {
        let pinned = match self.read::<PinnedMap>(PINNED_ITEMS_KEY)? {
            Some(pinned) => pinned,
            None => self.migrate()?,
        };

        let mut items: Vec<_> = pinned.into_iter().collect();
        items.sort_by(|(_, a), (_, b)| b.timestamp().cmp(&a.timestamp()));
        Ok(items)
    }

    /// Upserts (`Some`) or removes (`None`) a pin and writes the full map back
    pub fn update_pinned(&self, id: &str, item: Option<PinnedItem>) -> ViewResult<()> {
        let mut pinned = self.read::<PinnedMap>(PINNED_ITEMS_KEY)?.unwrap_or_default();
        match item {
            Some(item) => {
                pinned.insert(id.to_string(), item);
            }
            None => {
                pinned.remove(id);
            }
        }
        debug!(id, count = pinned.len(), "persisting pins");
        self.write(PINNED_ITEMS_KEY, &pinned)
    }

    pub fn is_pinned(&self, id: &str) -> ViewResult<bool> {
        Ok(self
            .read::<PinnedMap>(PINNED_ITEMS_KEY)?
            .is_some_and(|pinned| pinned.contains_key(id)))
    }

    /// Whether new results are added next to previous ones instead of replacing them
    pub fn keep_results(&self) -> bool {
        self.read::<bool>(KEEP_RESULTS_KEY)
            .ok()
            .flatten()
            .unwrap_or(true)
    }

    pub fn set_keep_results(&self, keep: bool) -> ViewResult<()> {
        self.write(KEEP_RESULTS_KEY, &keep)
    }

    fn migrate(&self) -> ViewResult<PinnedMap> {
        let Some(deprecated) = self
            .read::<BTreeMap<String, DeprecatedPinnedComparison>>(
                DEPRECATED_PINNED_COMPARISONS_KEY,
            )?
        else {
            return Ok(PinnedMap::new());
        };

        let timestamp = Utc::now().timestamp_millis();
        let migrated: PinnedMap = deprecated
            .into_values()
            .map(|p| {
                let id = comparison_pin_id(&p.path, &p.ref1.reference, &p.ref2.reference);
                let item = PinnedItem::Comparison {
                    timestamp,
                    path: p.path,
                    ref1: p.ref1,
                    ref2: p.ref2,
                    notation: p.notation,
                };
                (id, item)
            })
            .collect();

        info!(count = migrated.len(), "migrating deprecated pinned comparisons");
        self.write(PINNED_ITEMS_KEY, &migrated)?;
        self.state.update(DEPRECATED_PINNED_COMPARISONS_KEY, None)?;
        Ok(migrated)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> ViewResult<Option<T>> {
        let Some(value) = self.state.get(key) else {
            return Ok(None);
        };
        if value.is_null() {
            return Ok(None);
        }
        let parsed = serde_json::from_value(value).map_err(|e| StateError::Malformed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(parsed))
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> ViewResult<()> {
        let value: Value = serde_json::to_value(value)?;
        self.state.update(key, Some(value))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NamedRef;
    use crate::infrastructure::state::MemoryStateStore;
    use serde_json::json;

    fn comparison(timestamp: i64, ref1: &str) -> PinnedItem {
        PinnedItem::Comparison {
            timestamp,
            path: "/r".into(),
            ref1: NamedRef::new(ref1),
            ref2: NamedRef::new("main"),
            notation: None,
        }
    }

    #[test]
    fn empty_state_has_no_pins() {
        let store = PinStore::new(Rc::new(MemoryStateStore::new()));
        assert!(store.get_pinned().unwrap().is_empty());
    }

    #[test]
    fn update_and_remove() {
        let state = Rc::new(MemoryStateStore::new());
        let store = PinStore::new(state.clone());

        store.update_pinned("a", Some(comparison(1, "dev"))).unwrap();
        store.update_pinned("b", Some(comparison(5, "feature"))).unwrap();

        let ids: Vec<_> = store.get_pinned().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(store.is_pinned("a").unwrap());

        store.update_pinned("a", None).unwrap();
        assert!(!store.is_pinned("a").unwrap());
        assert_eq!(state.get(PINNED_ITEMS_KEY).unwrap().as_object().unwrap().len(), 1);
    }

    #[test]
    fn keep_results_defaults_to_true() {
        let store = PinStore::new(Rc::new(MemoryStateStore::new()));
        assert!(store.keep_results());
        store.set_keep_results(false).unwrap();
        assert!(!store.keep_results());
    }

    #[test]
    fn migration_is_skipped_when_current_key_exists() {
        let state = Rc::new(MemoryStateStore::new());
        state
            .update(PINNED_ITEMS_KEY, Some(json!({})))
            .unwrap();
        state
            .update(
                DEPRECATED_PINNED_COMPARISONS_KEY,
                Some(json!({ "x": { "path": "/r", "ref1": { "ref": "a" }, "ref2": { "ref": "b" } } })),
            )
            .unwrap();

        let store = PinStore::new(state.clone());
        assert!(store.get_pinned().unwrap().is_empty());
        assert!(state.get(DEPRECATED_PINNED_COMPARISONS_KEY).is_some());
    }

    #[test]
    fn malformed_state_is_reported() {
        let state = Rc::new(MemoryStateStore::new());
        state.update(PINNED_ITEMS_KEY, Some(json!([1, 2]))).unwrap();
        let store = PinStore::new(state);
        assert!(store.get_pinned().is_err());
    }
}
