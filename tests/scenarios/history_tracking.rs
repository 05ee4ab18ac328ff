//! Scenario: File History Follows the Editor
//!
//! Journey: User switches between files and watches their history.
//!
//! Steps:
//! 1. File history view is open with no editor
//! 2. User flips through several files quickly
//! 3. Once the switching settles, the last file's history is shown
//! 4. Working-tree changes are listed above the commits
//!
//! Success Criteria:
//! - Intermediate editors are never fetched
//! - The tracked file is the last one focused
//! - Uncommitted changes come first, then paged commits

use std::time::{Duration, Instant};

use viewtree::domain::entities::UNCOMMITTED_SHA;
use viewtree::domain::value_objects::{ActiveEditorEvent, ChangeEvent, EditorSubject, ViewKind};

use crate::common::*;

fn focus(path: &str) -> ChangeEvent {
    ChangeEvent::ActiveEditor(ActiveEditorEvent {
        subject: Some(EditorSubject::file(REPO, path)),
        pending: false,
    })
}

fn harness() -> Harness {
    let json = workspace(&[RepoFixture::new(REPO)
        .current_branch("main", 0)
        .linear_history("main", 10)
        .modified("src/lib.rs")]);
    Harness::new(ViewKind::FileHistory, paged_config(5), &json)
}

/// SCENARIO: Quick switching settles on the last file
#[test]
fn scenario_switching_settles_on_the_last_file() {
    let h = harness();
    assert!(h.rows().is_empty());
    assert!(h.tree.message().is_some());
    let start = Instant::now();

    h.hub.publish_at(&focus("README.md"), start);
    h.hub.publish_at(&focus("Cargo.toml"), start + Duration::from_millis(100));
    h.hub.publish_at(&focus("src/lib.rs"), start + Duration::from_millis(200));
    h.tree.tick_at(start + Duration::from_millis(300));
    assert!(h.host.changes().is_empty());

    h.tree.tick_at(start + Duration::from_millis(500));
    assert!(h.host.take_changes().contains(&None));
    h.rows();

    assert_eq!(h.tree.tracked_subject().map(|s| s.path).as_deref(), Some("src/lib.rs"));
    assert_eq!(h.git.call_count("get_log"), 1);
}

/// SCENARIO: History lists working-tree changes, then a page of commits
#[test]
fn scenario_history_lists_uncommitted_first() {
    let h = harness();
    h.tree
        .track(Some(EditorSubject::file(REPO, "src/lib.rs")))
        .expect("file history view tracks files");

    let rows = h.rows();

    let shas = commit_shas(&rows);
    assert_eq!(shas[0], UNCOMMITTED_SHA);
    assert_eq!(&shas[1..], &(0..5).map(sha).collect::<Vec<_>>()[..]);
    assert!(has_load_more(&rows));
    assert_eq!(h.tree.description().as_deref(), Some("lib.rs"));
}

/// SCENARIO: Paging file history
#[test]
fn scenario_history_pages_to_the_end() {
    let h = harness();
    h.tree
        .track(Some(EditorSubject::file(REPO, "src/lib.rs")))
        .expect("file history view tracks files");

    let rows = h.rows();
    let load_more = rows.last().expect("load more row").clone();
    assert!(h.tree.activate_load_more(&load_more).expect("paging succeeds"));

    let rows = h.rows();
    assert_eq!(commit_shas(&rows).len(), 11);
    assert!(!has_load_more(&rows));
}
