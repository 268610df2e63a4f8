//! Expense Group Domain
//!
//! This crate holds the expense group record, its status codes, the
//! filter/sort vocabulary used by list queries, and the repository port that
//! persistence adapters implement.
//!
//! # Examples
//!
//! ```rust
//! use domain_expense::{ExpenseGroup, ExpenseGroupQuery, ExpenseGroupStatus, SortOrder};
//!
//! let open = ExpenseGroup::new("u1", "Trip to Antwerp", ExpenseGroupStatus::Open);
//! let confirmed = ExpenseGroup::new("u1", "Conference", ExpenseGroupStatus::Confirmed);
//!
//! let query = ExpenseGroupQuery::new(SortOrder::parse("-name").unwrap())
//!     .with_status(ExpenseGroupStatus::from_name("confirmed"));
//!
//! let matched = query.apply(vec![open, confirmed]);
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].name, "Conference");
//! ```

pub mod expense_group;
pub mod query;
pub mod error;
pub mod ports;

pub use expense_group::{Expense, ExpenseGroup, ExpenseGroupStatus};
pub use query::{ExpenseGroupQuery, SortDirection, SortField, SortKey, SortOrder};
pub use error::DomainError;
pub use ports::{ExpenseGroupPort, RepositoryActionResult, RepositoryActionStatus};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockExpenseGroupPort;
