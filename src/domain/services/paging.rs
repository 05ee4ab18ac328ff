//! Page-size rules shared by pageable nodes

/// Widens a branch's first page so its unpublished commits fit.
///
/// When more commits are ahead of the upstream than `limit` allows, the
/// page grows to `ahead + 1` (one published commit as context) but never
/// beyond twice the configured limit. A `limit` of 0 already means
/// "everything" and is returned unchanged.
pub fn widen_for_unpublished(limit: usize, ahead: usize) -> usize {
    if limit != 0 && ahead > limit {
        (ahead + 1).min(limit * 2)
    } else {
        limit
    }
}
