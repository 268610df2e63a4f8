//! Pre-built Test Fixtures
//!
//! Ready-to-use expense groups and JSON request bodies. Values are fixed so
//! assertions can name them directly.

use chrono::NaiveDate;
use domain_expense::{ExpenseGroup, ExpenseGroupStatus};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::builders::{ExpenseBuilder, ExpenseGroupBuilder};

/// User ids shared across fixtures
pub struct UserFixtures;

impl UserFixtures {
    pub fn alice() -> &'static str {
        "alice"
    }

    pub fn bob() -> &'static str {
        "bob"
    }
}

/// Fixed calendar dates
pub struct DateFixtures;

static TRIP_START: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid fixture date"));

impl DateFixtures {
    pub fn trip_start() -> NaiveDate {
        *TRIP_START
    }

    pub fn trip_end() -> NaiveDate {
        *TRIP_START + chrono::Duration::days(3)
    }
}

/// Fixture expense groups
pub struct ExpenseGroupFixtures;

impl ExpenseGroupFixtures {
    /// An open group with two expenses owned by alice
    pub fn antwerp_trip() -> ExpenseGroup {
        ExpenseGroupBuilder::new()
            .with_user_id(UserFixtures::alice())
            .with_name("Antwerp trip")
            .with_description("Client visit")
            .with_status(ExpenseGroupStatus::Open)
            .with_expense(
                ExpenseBuilder::new()
                    .with_description("Train tickets")
                    .with_date(DateFixtures::trip_start())
                    .with_amount(dec!(84.40))
                    .build(),
            )
            .with_expense(
                ExpenseBuilder::new()
                    .with_description("Hotel")
                    .with_date(DateFixtures::trip_end())
                    .with_amount(dec!(312.00))
                    .build(),
            )
            .build()
    }

    /// A confirmed group without description owned by alice
    pub fn conference() -> ExpenseGroup {
        ExpenseGroupBuilder::new()
            .with_user_id(UserFixtures::alice())
            .with_name("Conference")
            .with_status(ExpenseGroupStatus::Confirmed)
            .build()
    }

    /// A processed group owned by bob
    pub fn office_supplies() -> ExpenseGroup {
        ExpenseGroupBuilder::new()
            .with_user_id(UserFixtures::bob())
            .with_name("Office supplies")
            .with_description("Q1 order")
            .with_status(ExpenseGroupStatus::Processed)
            .with_expense(ExpenseBuilder::new().with_amount(dec!(19.99)).build())
            .build()
    }

    /// The three fixture groups; stored in this order they receive ids 1, 2, 3
    pub fn all() -> Vec<ExpenseGroup> {
        vec![Self::antwerp_trip(), Self::conference(), Self::office_supplies()]
    }

    /// `count` open groups for alice named "Group 01", "Group 02", ...
    pub fn numbered(count: usize) -> Vec<ExpenseGroup> {
        (1..=count)
            .map(|n| {
                ExpenseGroupBuilder::new()
                    .with_name(format!("Group {:02}", n))
                    .build()
            })
            .collect()
    }
}

/// JSON request bodies in the API's wire format
pub struct RequestFixtures;

impl RequestFixtures {
    /// A create body with one expense
    pub fn create_body() -> Value {
        json!({
            "userId": UserFixtures::bob(),
            "name": "Client dinner",
            "description": "Dinner with the Ghent team",
            "status": 1,
            "expenses": [
                {
                    "description": "Restaurant",
                    "date": "2024-03-05",
                    "amount": "142.50"
                }
            ]
        })
    }

    /// A full replacement body
    pub fn replace_body(id: i32) -> Value {
        json!({
            "id": id,
            "userId": UserFixtures::alice(),
            "name": "Renamed group",
            "description": null,
            "status": 2
        })
    }
}
