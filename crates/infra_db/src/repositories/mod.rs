//! Repository implementations
//!
//! Repositories own the SQL for one aggregate and map between database rows
//! and plain row structs. Domain conversion happens in the adapters.

pub mod expense_group;

pub use expense_group::ExpenseGroupRepository;
