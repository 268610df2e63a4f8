//! Request/response data transfer objects

pub mod expense_group;

pub use expense_group::{ExpenseDto, ExpenseGroupDto};
