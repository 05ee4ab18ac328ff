//! Scenario: Repository Changes Invalidate the Right Rows
//!
//! Journey: User works in the terminal while the commits view is open.
//!
//! Steps:
//! 1. View lists the current branch
//! 2. Repository reports a change (commit, checkout, stash...)
//! 3. Relevant changes refresh the repository; others are ignored
//! 4. A full reset drops every subscription until rows are listed again
//!
//! Success Criteria:
//! - Relevant changes notify the host and refetch on the next listing
//! - Irrelevant or foreign changes cost nothing
//! - No subscription outlives the nodes that own it

use viewtree::domain::value_objects::{
    ChangeEvent, RepositoryChange, RepositoryChangeEvent, ViewKind,
};

use crate::common::*;

fn repository_event(path: &str, change: RepositoryChange) -> ChangeEvent {
    ChangeEvent::Repository(RepositoryChangeEvent::new(path, [change]))
}

/// SCENARIO: A new commit refreshes the splatted repository
#[test]
fn scenario_head_change_refetches_the_log() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(10, 0));
    h.rows();
    let fetches = h.git.log_fetches();
    h.host.take_changes();

    h.hub.publish(&repository_event(REPO, RepositoryChange::Heads));

    // The repository has no row of its own, so the whole tree is repainted
    assert_eq!(h.host.take_changes(), vec![None]);
    assert_eq!(commit_shas(&h.rows()).len(), 3);
    assert_eq!(h.git.log_fetches(), fetches + 1);
}

/// SCENARIO: A soft refresh repaints from the fetched log
#[test]
fn scenario_soft_refresh_keeps_the_fetched_log() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(10, 0));
    let before = commit_shas(&h.rows());
    let fetches = h.git.log_fetches();
    h.host.take_changes();

    h.tree.refresh(false).expect("refresh succeeds");

    assert_eq!(h.host.take_changes().last(), Some(&None));
    assert_eq!(commit_shas(&h.rows()), before);
    assert_eq!(h.git.log_fetches(), fetches);
    assert_eq!(h.hub.live_subscriptions(), 1);

    h.tree.refresh(true).expect("refresh succeeds");
    h.rows();
    assert_eq!(h.git.log_fetches(), fetches + 1);
}

/// SCENARIO: Stash changes do not concern the commits view
#[test]
fn scenario_irrelevant_change_is_ignored() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(10, 0));
    let before = h.rows();
    let fetches = h.git.log_fetches();
    h.host.take_changes();

    h.hub.publish(&repository_event(REPO, RepositoryChange::Stash));
    h.hub.publish(&repository_event("/work/other", RepositoryChange::Heads));

    assert!(h.host.changes().is_empty());
    let after = h.rows();
    assert!(before.iter().zip(&after).all(|(a, b)| std::rc::Rc::ptr_eq(a, b)));
    assert_eq!(h.git.log_fetches(), fetches);
}

/// SCENARIO: Resetting the view releases subscriptions until it is listed again
#[test]
fn scenario_reset_releases_subscriptions() {
    let json = workspace(&[
        RepoFixture::new("/work/a").current_branch("main", 0).linear_history("main", 2),
        RepoFixture::new("/work/b").current_branch("main", 0).linear_history("main", 2),
    ]);
    let h = Harness::new(ViewKind::Branches, paged_config(3), &json);
    let repositories = h.rows();
    for repository in &repositories {
        h.tree.get_children(Some(repository)).expect("branches");
    }
    assert_eq!(h.hub.live_subscriptions(), 2);

    h.tree.refresh(true).expect("refresh succeeds");

    assert_eq!(h.hub.live_subscriptions(), 0);
    assert!(repositories.iter().all(|r| r.is_disposed()));
    assert_eq!(h.host.take_changes().last(), Some(&None));

    let relisted = h.rows();
    for repository in &relisted {
        h.tree.get_children(Some(repository)).expect("branches");
    }
    assert_eq!(h.hub.live_subscriptions(), 2);
}

/// SCENARIO: Hiding the view unsubscribes, showing it again resubscribes
#[test]
fn scenario_visibility_controls_subscriptions() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(4, 0));
    h.rows();
    assert_eq!(h.hub.live_subscriptions(), 1);

    h.tree.set_visible(false);
    assert_eq!(h.hub.live_subscriptions(), 0);
    h.hub.publish(&repository_event(REPO, RepositoryChange::Heads));
    assert!(h.host.changes().is_empty());

    h.tree.set_visible(true);
    assert_eq!(h.hub.live_subscriptions(), 1);
}
