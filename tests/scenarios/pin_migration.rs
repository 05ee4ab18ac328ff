//! Scenario: Upgrading a Workspace with Old Pinned Comparisons
//!
//! Journey: User opens a workspace whose pins were saved in the old format.
//!
//! Steps:
//! 1. Workspace state holds comparisons under the deprecated key only
//! 2. Pins are read for the first time
//! 3. They are rewritten under the current key and the old key is removed
//!
//! Success Criteria:
//! - Every deprecated comparison survives the move
//! - Reading again writes nothing and duplicates nothing
//! - The search and compare view restores the migrated pin

use std::rc::Rc;

use serde_json::{json, Value};

use viewtree::application::pins::{PinStore, DEPRECATED_PINNED_COMPARISONS_KEY, PINNED_ITEMS_KEY};
use viewtree::domain::entities::PinnedItem;
use viewtree::domain::ports::StateStore;
use viewtree::domain::value_objects::ViewKind;
use viewtree::infrastructure::MemoryStateStore;

use crate::common::*;

fn deprecated_pins() -> Value {
    json!({
        "first": { "path": REPO, "ref1": { "ref": "main" }, "ref2": { "ref": "base" } },
        "second": { "path": REPO, "ref1": { "ref": "feature" }, "ref2": { "label": "Release", "ref": "v1.0" } }
    })
}

fn legacy_state() -> MemoryStateStore {
    MemoryStateStore::new().with_value(DEPRECATED_PINNED_COMPARISONS_KEY, deprecated_pins())
}

/// SCENARIO: First read moves pins to the current key
#[test]
fn scenario_first_read_migrates() {
    let state = Rc::new(legacy_state());
    let store = PinStore::new(state.clone());

    let pinned = store.get_pinned().expect("migration succeeds");

    assert_eq!(pinned.len(), 2);
    assert!(pinned
        .iter()
        .all(|(id, item)| matches!(item, PinnedItem::Comparison { .. }) && *id == item.id()));
    let current = state.get(PINNED_ITEMS_KEY).expect("pins are written");
    assert_eq!(current.as_object().map(|m| m.len()), Some(2));
    assert!(state.get(DEPRECATED_PINNED_COMPARISONS_KEY).is_none());
    assert_eq!(state.writes(), 2);
}

/// SCENARIO: Second read is a plain read
#[test]
fn scenario_second_read_writes_nothing() {
    let state = Rc::new(legacy_state());
    let store = PinStore::new(state.clone());
    let first = store.get_pinned().expect("migration succeeds");
    let writes = state.writes();

    let second = store.get_pinned().expect("read succeeds");

    assert_eq!(state.writes(), writes);
    assert_eq!(second, first);
}

/// SCENARIO: Labels of migrated refs are kept
#[test]
fn scenario_ref_labels_survive() {
    let store = PinStore::new(Rc::new(legacy_state()));

    let pinned = store.get_pinned().expect("migration succeeds");

    let release = pinned.iter().find_map(|(_, item)| match item {
        PinnedItem::Comparison { ref2, .. } if ref2.reference == "v1.0" => Some(ref2.clone()),
        _ => None,
    });
    assert_eq!(release.and_then(|r| r.label).as_deref(), Some("Release"));
}

/// SCENARIO: The view restores migrated pins as result nodes
#[test]
fn scenario_view_restores_migrated_pins() {
    let json = workspace(&[RepoFixture::new(REPO)
        .current_branch("main", 0)
        .branch("base")
        .linear_history("main", 4)]);
    let h = Harness::with_state(ViewKind::SearchAndCompare, paged_config(5), &json, legacy_state());

    let rows = h.rows();

    let ids: Vec<_> = rows.iter().map(|n| n.id().to_string()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"viewtree:repository(/work/app):compare(main|base)".to_string()));
    assert!(h.state.contains(PINNED_ITEMS_KEY));
    assert!(!h.state.contains(DEPRECATED_PINNED_COMPARISONS_KEY));
}
