//! Property-Based Test Generators
//!
//! Provides proptest strategies for expense groups and list query inputs.

use chrono::{Duration, NaiveDate};
use core_kernel::{ExpenseGroupId, ExpenseId};
use domain_expense::{Expense, ExpenseGroup, ExpenseGroupStatus};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating status values
pub fn status_strategy() -> impl Strategy<Value = ExpenseGroupStatus> {
    prop_oneof![
        Just(ExpenseGroupStatus::Open),
        Just(ExpenseGroupStatus::Confirmed),
        Just(ExpenseGroupStatus::Processed),
    ]
}

/// Strategy for generating positive amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating dates in 2020..2030
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid base date") + Duration::days(offset)
    })
}

/// Strategy for generating non-blank user ids from a small pool, so filters hit
pub fn user_id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("alice"), Just("bob"), Just("carol")].prop_map(String::from)
}

/// Strategy for generating unsaved expenses
pub fn expense_strategy() -> impl Strategy<Value = Expense> {
    ("[A-Za-z ]{1,20}", date_strategy(), amount_strategy()).prop_map(
        |(description, date, amount)| Expense {
            id: ExpenseId::default(),
            expense_group_id: ExpenseGroupId::default(),
            description,
            date,
            amount,
        },
    )
}

/// Strategy for generating unsaved expense groups
pub fn expense_group_strategy() -> impl Strategy<Value = ExpenseGroup> {
    (
        user_id_strategy(),
        "[A-Za-z0-9 ]{1,24}",
        proptest::option::of("[a-z ]{0,30}"),
        status_strategy(),
        proptest::collection::vec(expense_strategy(), 0..4),
    )
        .prop_map(|(user_id, name, description, status, expenses)| ExpenseGroup {
            id: ExpenseGroupId::default(),
            user_id,
            name,
            description,
            status,
            expenses,
        })
}

/// Strategy for generating valid sort expressions such as `-status,name`
pub fn sort_expression_strategy() -> impl Strategy<Value = String> {
    let key = (
        prop_oneof![
            Just("id"),
            Just("userId"),
            Just("name"),
            Just("description"),
            Just("status"),
        ],
        any::<bool>(),
    )
        .prop_map(|(field, descending)| {
            if descending {
                format!("-{}", field)
            } else {
                field.to_string()
            }
        });

    proptest::collection::vec(key, 1..4).prop_map(|keys| keys.join(","))
}

/// Strategy for generating page/page size pairs
pub fn paging_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..20u32, 1u32..30u32)
}
