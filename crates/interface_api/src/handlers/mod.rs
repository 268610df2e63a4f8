//! Request handlers

pub mod expense_groups;
pub mod health;
