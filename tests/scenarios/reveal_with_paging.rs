//! Scenario: Reveal a Commit Deep in the Log
//!
//! Journey: User jumps to a commit that is far beyond the first page.
//!
//! Steps:
//! 1. Commits view shows the first page of a long log
//! 2. User asks to reveal an old commit
//! 3. The branch pages until the commit is loaded, then it is revealed
//!
//! Success Criteria:
//! - The log is extended exactly through the commit
//! - The page size is remembered for rebuilt nodes
//! - A cancelled request fetches nothing

use viewtree::domain::ports::RevealOptions;
use viewtree::domain::value_objects::{CancellationToken, ViewKind};

use crate::common::*;

/// SCENARIO: Commit 42 of 50 is revealed after paging
#[test]
fn scenario_reveal_pages_through_to_the_commit() {
    let h = Harness::new(ViewKind::Commits, paged_config(5), &simple_workspace(50, 0));
    assert_eq!(commit_shas(&h.rows()).len(), 5);

    let node = h
        .tree
        .reveal_commit(REPO, &sha(42), RevealOptions::selected(), None)
        .expect("reveal should not fail")
        .expect("commit should be found");

    assert_eq!(node.commit_sha(), Some(sha(42).as_str()));
    let branch = node.parent().expect("commit has a branch");
    assert_eq!(branch.loaded_count(), 43);
    assert_eq!(h.tree.node_last_known_limit(&branch), Some(43));
    assert_eq!(h.host.revealed_ids(), vec![node.id().to_string()]);

    let rows = h.rows();
    assert_eq!(commit_shas(&rows).len(), 43);
    assert!(has_load_more(&rows));
}

/// SCENARIO: User cancels before the search starts
#[test]
fn scenario_cancelled_reveal_fetches_nothing() {
    let h = Harness::new(ViewKind::Commits, paged_config(5), &simple_workspace(50, 0));
    let token = CancellationToken::new();
    token.cancel();

    let found = h
        .tree
        .reveal_commit(REPO, &sha(42), RevealOptions::selected(), Some(&token))
        .expect("cancellation is not an error");

    assert!(found.is_none());
    assert_eq!(h.git.log_fetches(), 0);
    assert!(h.host.revealed_ids().is_empty());
}

/// SCENARIO: "Load more" rows page until the log is exhausted
#[test]
fn scenario_load_more_until_the_end() {
    let h = Harness::new(ViewKind::Commits, paged_config(5), &simple_workspace(12, 0));

    let mut rounds = 0;
    loop {
        let rows = h.rows();
        let Some(load_more) = rows.iter().find(|n| n.kind().name() == "load-more") else {
            assert_eq!(commit_shas(&rows).len(), 12);
            break;
        };
        assert!(h.tree.activate_load_more(load_more).expect("paging succeeds"));
        rounds += 1;
        assert!(rounds <= 3, "paging should finish in three rounds");
    }
    assert_eq!(rounds, 2);
}
