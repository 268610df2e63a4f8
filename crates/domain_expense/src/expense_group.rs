//! Expense group record and its line items
//!
//! An expense group bundles the expenses a user submits together (a trip, a
//! conference) and moves through the `Open → Confirmed → Processed` statuses.
//! Status transitions are not enforced here: any status may be written by an
//! update.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ExpenseGroupId, ExpenseId};
use crate::error::DomainError;

/// Processing status of an expense group
///
/// Serialized as its integer code (`1`, `2`, `3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ExpenseGroupStatus {
    Open = 1,
    Confirmed = 2,
    Processed = 3,
}

impl ExpenseGroupStatus {
    /// All statuses in code order
    pub const ALL: [ExpenseGroupStatus; 3] = [
        ExpenseGroupStatus::Open,
        ExpenseGroupStatus::Confirmed,
        ExpenseGroupStatus::Processed,
    ];

    /// Returns the integer code stored in the database and sent over the wire
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Resolves a status name from a query string, ignoring case.
    ///
    /// Unrecognized names yield `None`, which list queries treat as
    /// "no status filter".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "open" => Some(ExpenseGroupStatus::Open),
            "confirmed" => Some(ExpenseGroupStatus::Confirmed),
            "processed" => Some(ExpenseGroupStatus::Processed),
            _ => None,
        }
    }

    /// Lower-case name as accepted by [`ExpenseGroupStatus::from_name`]
    pub const fn name(self) -> &'static str {
        match self {
            ExpenseGroupStatus::Open => "open",
            ExpenseGroupStatus::Confirmed => "confirmed",
            ExpenseGroupStatus::Processed => "processed",
        }
    }
}

impl TryFrom<i32> for ExpenseGroupStatus {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ExpenseGroupStatus::Open),
            2 => Ok(ExpenseGroupStatus::Confirmed),
            3 => Ok(ExpenseGroupStatus::Processed),
            other => Err(DomainError::UnknownStatus(other)),
        }
    }
}

impl From<ExpenseGroupStatus> for i32 {
    fn from(status: ExpenseGroupStatus) -> i32 {
        status.code()
    }
}

impl std::fmt::Display for ExpenseGroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single expense line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub expense_group_id: ExpenseGroupId,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// The expense group aggregate as stored by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseGroup {
    /// Assigned by persistence on insert; unassigned (0) before that
    pub id: ExpenseGroupId,
    /// Owner of the group, fixed at creation
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ExpenseGroupStatus,
    pub expenses: Vec<Expense>,
}

impl ExpenseGroup {
    /// Creates an unsaved group with no expenses
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        status: ExpenseGroupStatus,
    ) -> Self {
        Self {
            id: ExpenseGroupId::default(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            status,
            expenses: Vec::new(),
        }
    }

    /// Sum of all expense amounts
    pub fn total_amount(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}
