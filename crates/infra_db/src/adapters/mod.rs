//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain records and database row types
//! - Uses the repository layer for database operations

pub mod expense_group;

pub use expense_group::PostgresExpenseGroupAdapter;
