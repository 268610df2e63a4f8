//! Custom Test Assertions
//!
//! Assertion helpers for listing results that print the offending records
//! instead of a bare boolean failure.

use std::cmp::Ordering;

use domain_expense::{ExpenseGroup, ExpenseGroupQuery, SortOrder};

/// Asserts that `groups` is ordered according to `order`
///
/// # Panics
///
/// Panics on the first adjacent pair that is out of order
pub fn assert_sorted_by(groups: &[ExpenseGroup], order: &SortOrder) {
    for pair in groups.windows(2) {
        assert_ne!(
            order.compare(&pair[0], &pair[1]),
            Ordering::Greater,
            "Groups out of order: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Asserts that every group satisfies the query's filters
pub fn assert_all_match(groups: &[ExpenseGroup], query: &ExpenseGroupQuery) {
    for group in groups {
        assert!(
            query.matches(group),
            "Group {} (status={}, user={}) does not match the query",
            group.id,
            group.status,
            group.user_id
        );
    }
}

/// Asserts two groups carry the same content, ignoring database-assigned ids
pub fn assert_same_content(actual: &ExpenseGroup, expected: &ExpenseGroup) {
    assert_eq!(actual.user_id, expected.user_id, "user_id differs");
    assert_eq!(actual.name, expected.name, "name differs");
    assert_eq!(actual.description, expected.description, "description differs");
    assert_eq!(actual.status, expected.status, "status differs");
    assert_eq!(
        actual.expenses.len(),
        expected.expenses.len(),
        "expense count differs"
    );
    for (a, e) in actual.expenses.iter().zip(&expected.expenses) {
        assert_eq!(a.description, e.description);
        assert_eq!(a.date, e.date);
        assert_eq!(a.amount, e.amount);
    }
}
