//! Strongly-typed identifiers for persisted records
//!
//! Records are keyed by database-assigned integers. Wrapping them in newtypes
//! keeps an expense id from being passed where a group id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates from a raw database key
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw database key
            pub const fn value(&self) -> i32 {
                self.0
            }

            /// Returns true for the placeholder id carried by records that
            /// have not been persisted yet
            pub const fn is_unassigned(&self) -> bool {
                self.0 == 0
            }

            /// Returns the entity name used in log and error messages
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| CoreError::invalid_identifier($entity, s))
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> i32 {
                id.0
            }
        }
    };
}

define_id!(ExpenseGroupId, "ExpenseGroup");
define_id!(ExpenseId, "Expense");
