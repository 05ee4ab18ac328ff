//! Property tests for paged commit logs.

use std::rc::Rc;

use proptest::prelude::*;

use viewtree::domain::entities::{LogQuery, PageRequest};
use viewtree::domain::ports::RepositoryService;
use viewtree::domain::services::widen_for_unpublished;
use viewtree::infrastructure::FixtureRepositoryService;

use crate::common::{sha, simple_workspace, REPO};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `more_log` never shrinks a log, and an exhausted log stays identical.
    #[test]
    fn property_paging_is_monotonic(
        total in 1usize..40,
        first in 1usize..10,
        steps in proptest::collection::vec(1usize..8, 1..12),
    ) {
        let git = FixtureRepositoryService::from_json(&simple_workspace(total, 0)).unwrap();
        let query = LogQuery::new(REPO).reference("main").limit(first);
        let mut log = git.get_log(&query).unwrap().unwrap();
        prop_assert_eq!(log.count(), first.min(total));

        for step in steps {
            let next = git.more_log(&log, &PageRequest::Size(step)).unwrap().unwrap();
            prop_assert!(next.count() >= log.count());
            if !log.has_more {
                prop_assert!(Rc::ptr_eq(&next, &log));
            }
            prop_assert_eq!(next.has_more, next.count() < total);
            log = next;
        }
    }

    /// PROPERTY: paging until a sha either includes it or makes no progress.
    #[test]
    fn property_until_includes_marker(total in 2usize..30, first in 1usize..5, target in 0usize..40) {
        let git = FixtureRepositoryService::from_json(&simple_workspace(total, 0)).unwrap();
        let log = git
            .get_log(&LogQuery::new(REPO).reference("main").limit(first))
            .unwrap()
            .unwrap();

        let next = git.more_log(&log, &PageRequest::Until(sha(target))).unwrap().unwrap();

        if target < total && target >= log.count() {
            prop_assert_eq!(next.count(), target + 1);
            prop_assert!(next.contains(&sha(target)));
        } else {
            prop_assert!(Rc::ptr_eq(&next, &log));
        }
    }

    /// PROPERTY: widening only grows the page and stays within twice the limit.
    #[test]
    fn property_widening_bounds(limit in 1usize..100, ahead in 0usize..300) {
        let widened = widen_for_unpublished(limit, ahead);
        prop_assert!(widened >= limit);
        prop_assert!(widened <= limit * 2);
        if ahead <= limit {
            prop_assert_eq!(widened, limit);
        }
    }
}
