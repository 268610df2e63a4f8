//! Core Kernel - Foundational types shared by the expense tracker crates
//!
//! This crate provides the fundamental building blocks used across the workspace:
//! - Strongly-typed integer identifiers for persisted records
//! - The port error vocabulary used at every repository boundary
//! - Health check types for adapters

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{ExpenseGroupId, ExpenseId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
