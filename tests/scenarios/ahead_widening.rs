//! Scenario: Unpublished Commits Fit on the First Page
//!
//! Journey: User has local commits that are not pushed yet and opens a view.
//!
//! Steps:
//! 1. Current branch is ahead of its upstream
//! 2. User opens the commits view (or expands the branch elsewhere)
//! 3. First page is widened so every unpublished commit is listed
//!
//! Success Criteria:
//! - Widened page holds `ahead + 1` commits, at most twice the limit
//! - No "load more" row when the whole log fits

use viewtree::domain::value_objects::ViewKind;

use crate::common::*;

/// SCENARIO: Limit already covers the unpublished commits
#[test]
fn scenario_small_branch_fits_without_paging() {
    let h = Harness::new(ViewKind::Commits, paged_config(10), &simple_workspace(5, 5));

    let rows = h.rows();

    assert_eq!(commit_shas(&rows).len(), 5);
    assert!(!has_load_more(&rows));
}

/// SCENARIO: Widening is capped by the log length
#[test]
fn scenario_widened_page_stops_at_the_end_of_the_log() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(5, 5));

    let rows = h.rows();

    // 6 requested, only 5 exist
    assert_eq!(commit_shas(&rows).len(), 5);
    assert!(!has_load_more(&rows));
}

/// SCENARIO: Long log, several unpublished commits
#[test]
fn scenario_widened_page_in_a_long_log() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(20, 5));

    let rows = h.rows();

    assert_eq!(commit_shas(&rows), (0..6).map(sha).collect::<Vec<_>>());
    assert!(has_load_more(&rows));
}

/// SCENARIO: Widening never exceeds twice the limit
#[test]
fn scenario_widening_is_capped_at_twice_the_limit() {
    let h = Harness::new(ViewKind::Commits, paged_config(3), &simple_workspace(30, 12));

    let rows = h.rows();

    assert_eq!(commit_shas(&rows).len(), 6);
    assert!(has_load_more(&rows));
}

/// SCENARIO: Tracking rows sit above the widened commits
#[test]
fn scenario_tracking_row_announces_unpublished_commits() {
    let mut config = paged_config(3);
    config.commits.show_tracking = true;
    let h = Harness::new(ViewKind::Commits, config, &simple_workspace(20, 5));

    let rows = h.rows();

    assert_eq!(rows[0].kind().name(), "status-branch");
    let item = h.tree.get_tree_item(&rows[0]).expect("tracking row");
    assert_eq!(item.label, "5 commits ahead");
    assert_eq!(rows[1].kind().name(), "message");
    assert_eq!(commit_shas(&rows).len(), 6);
}

/// SCENARIO: A branch expanded in the branches view uses the default limit
#[test]
fn scenario_branches_view_widens_from_the_default_limit() {
    let mut config = paged_config(10);
    config.default_item_limit = 3;
    let h = Harness::new(ViewKind::Branches, config, &simple_workspace(20, 5));

    let rows = h.rows();
    assert_eq!(rows.len(), 1);
    let commits = h.tree.get_children(Some(&rows[0])).expect("branch commits");

    assert_eq!(commit_shas(&commits).len(), 6);
    assert!(has_load_more(&commits));
}
