//! Scenario: "Last fetched" Keeps Up With Fetches
//!
//! Journey: User leaves the commits view open while fetching now and then.
//!
//! Steps:
//! 1. View lists a repository fetched recently
//! 2. Host ticks the tree as time passes
//! 3. User fetches; the repository reports a remote change
//!
//! Success Criteria:
//! - Recently fetched data is repainted every 30 seconds
//! - A new fetch brings back the short period even when the old one had lengthened
//! - Repaints never refetch the log

use std::fs;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tempfile::tempdir;
use viewtree::domain::value_objects::{
    ChangeEvent, RepositoryChange, RepositoryChangeEvent, ViewKind,
};
use viewtree::infrastructure::{FixtureRepositoryService, MemoryStateStore};

use crate::common::*;

fn snapshot(fetched: DateTime<Utc>) -> String {
    workspace(&[RepoFixture::new(REPO)
        .current_branch("main", 0)
        .linear_history("main", 3)
        .last_fetched(&fetched.to_rfc3339())])
}

fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::minutes(minutes)
}

/// SCENARIO: A recent fetch repaints the view every 30 seconds
#[test]
fn scenario_recent_fetch_repaints_every_half_minute() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &snapshot(minutes_ago(5)));
    h.rows();
    let fetches = h.git.log_fetches();
    h.host.take_changes();
    let start = Instant::now();

    h.tree.tick_at(start + Duration::from_secs(10));
    assert!(h.host.take_changes().is_empty());

    h.tree.tick_at(start + Duration::from_secs(31));
    assert_eq!(h.host.take_changes(), vec![None]);

    h.tree.tick_at(start + Duration::from_secs(62));
    assert_eq!(h.host.take_changes(), vec![None]);
    assert_eq!(h.git.log_fetches(), fetches);
}

/// SCENARIO: Fetching again restores the short period
#[test]
fn scenario_new_fetch_restarts_the_timer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("repos.json");
    fs::write(&path, snapshot(minutes_ago(50))).unwrap();

    let git = FixtureRepositoryService::from_path(&path).unwrap();
    let h = Harness::with_service(ViewKind::Commits, paged_config(3), git, MemoryStateStore::new());
    h.rows();

    fs::write(&path, snapshot(Utc::now())).unwrap();
    h.git.reload().unwrap();
    let event = ChangeEvent::Repository(RepositoryChangeEvent::new(REPO, [RepositoryChange::Remotes]));
    h.hub.publish(&event);
    h.rows();
    h.host.take_changes();
    let start = Instant::now();

    // The old timer would have stretched to 30 minutes by now
    h.tree.tick_at(start + Duration::from_secs(11 * 60));
    assert_eq!(h.host.take_changes(), vec![None]);

    h.tree.tick_at(start + Duration::from_secs(11 * 60 + 31));
    assert_eq!(h.host.take_changes(), vec![None]);
}
