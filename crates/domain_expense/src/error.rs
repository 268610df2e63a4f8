//! Expense domain errors

use thiserror::Error;

/// Errors raised while interpreting expense group data or list parameters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A status code outside the known set
    #[error("Unknown expense group status code: {0}")]
    UnknownStatus(i32),

    /// A sort key that does not name a sortable field
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
}
