//! Expense Group Ports
//!
//! This module defines the repository port for expense groups, enabling
//! swappable persistence implementations (PostgreSQL, in-memory mock).
//!
//! # Architecture
//!
//! The `ExpenseGroupPort` trait defines every operation the HTTP layer needs
//! from its data source:
//!
//! - **Internal Adapter**: PostgreSQL via `infra_db`
//! - **Mock Adapter**: In-memory store for tests without a database
//!
//! Write operations return a [`RepositoryActionResult`] describing the outcome
//! (created, updated, deleted, not found, rejected). An `Err(PortError)` is
//! reserved for failures where the operation could not be attempted or
//! completed at all.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_expense::ExpenseGroupPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ExpenseGroupPort> = Arc::new(PostgresExpenseGroupAdapter::new(pool));
//! let result = port.insert_expense_group(group).await?;
//! if result.status() == RepositoryActionStatus::Created { ... }
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, ExpenseGroupId, HealthCheckable, PortError};

use crate::expense_group::ExpenseGroup;
use crate::query::ExpenseGroupQuery;

/// Outcome of a repository write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryActionStatus {
    Created,
    Updated,
    Deleted,
    NotFound,
    /// The store refused the write (constraint violation, invalid data)
    Error,
}

/// Result of a repository write
///
/// Carries the affected entity exactly when the status is `Created` or
/// `Updated`. The constructors are the only way to build one, which keeps
/// that pairing intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryActionResult<T> {
    status: RepositoryActionStatus,
    entity: Option<T>,
    message: Option<String>,
}

impl<T> RepositoryActionResult<T> {
    pub fn created(entity: T) -> Self {
        Self {
            status: RepositoryActionStatus::Created,
            entity: Some(entity),
            message: None,
        }
    }

    pub fn updated(entity: T) -> Self {
        Self {
            status: RepositoryActionStatus::Updated,
            entity: Some(entity),
            message: None,
        }
    }

    pub fn deleted() -> Self {
        Self {
            status: RepositoryActionStatus::Deleted,
            entity: None,
            message: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: RepositoryActionStatus::NotFound,
            entity: None,
            message: None,
        }
    }

    /// A write the store rejected, with the reason
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RepositoryActionStatus::Error,
            entity: None,
            message: Some(message.into()),
        }
    }

    pub fn status(&self) -> RepositoryActionStatus {
        self.status
    }

    pub fn entity(&self) -> Option<&T> {
        self.entity.as_ref()
    }

    pub fn into_entity(self) -> Option<T> {
        self.entity
    }

    /// Rejection reason for `Error` results
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// The repository port for expense groups
///
/// Implementations must be thread-safe; the HTTP layer shares one instance
/// across all requests behind an `Arc<dyn ExpenseGroupPort>`.
#[async_trait]
pub trait ExpenseGroupPort: DomainPort + HealthCheckable {
    /// Returns every group passing the query's filters, in the query's order
    async fn find_expense_groups(
        &self,
        query: &ExpenseGroupQuery,
    ) -> Result<Vec<ExpenseGroup>, PortError>;

    /// Retrieves a group with its expenses, or `None` if there is no such id
    async fn get_expense_group(
        &self,
        id: ExpenseGroupId,
    ) -> Result<Option<ExpenseGroup>, PortError>;

    /// Stores a new group and its expenses, assigning fresh ids
    ///
    /// Any id carried by `group` is ignored.
    async fn insert_expense_group(
        &self,
        group: ExpenseGroup,
    ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError>;

    /// Overwrites name, description and status of the group with `group.id`
    ///
    /// The owner and the expenses are left untouched. The returned entity is
    /// the stored state after the write.
    async fn update_expense_group(
        &self,
        group: ExpenseGroup,
    ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError>;

    /// Permanently removes a group and its expenses
    async fn delete_expense_group(
        &self,
        id: ExpenseGroupId,
    ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError>;
}

/// Mock implementation of ExpenseGroupPort for testing
///
/// This adapter stores groups in memory and is useful for exercising the HTTP
/// layer without a database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tracing::debug;

    use core_kernel::{ExpenseId, HealthCheckResult};

    /// In-memory mock implementation of ExpenseGroupPort
    #[derive(Debug)]
    pub struct MockExpenseGroupPort {
        groups: Arc<RwLock<BTreeMap<ExpenseGroupId, ExpenseGroup>>>,
        next_group_id: AtomicI32,
        next_expense_id: AtomicI32,
        unavailable: AtomicBool,
        locked: AtomicBool,
        update_calls: AtomicUsize,
    }

    impl Default for MockExpenseGroupPort {
        fn default() -> Self {
            Self {
                groups: Arc::default(),
                next_group_id: AtomicI32::new(1),
                next_expense_id: AtomicI32::new(1),
                unavailable: AtomicBool::new(false),
                locked: AtomicBool::new(false),
                update_calls: AtomicUsize::new(0),
            }
        }
    }

    impl MockExpenseGroupPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with groups, assigning ids as an insert would
        pub async fn with_groups(groups: Vec<ExpenseGroup>) -> Self {
            let port = Self::new();
            for group in groups {
                let stored = port.assign_ids(group);
                port.groups.write().await.insert(stored.id, stored);
            }
            port
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Makes deletes of existing groups report an `Error` result
        pub fn set_locked(&self, locked: bool) {
            self.locked.store(locked, Ordering::SeqCst);
        }

        /// Number of `update_expense_group` calls received so far
        pub fn update_calls(&self) -> usize {
            self.update_calls.load(Ordering::SeqCst)
        }

        /// Number of stored groups
        pub async fn len(&self) -> usize {
            self.groups.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.groups.read().await.is_empty()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock expense group store is unavailable"));
            }
            Ok(())
        }

        fn assign_ids(&self, mut group: ExpenseGroup) -> ExpenseGroup {
            group.id = ExpenseGroupId::new(self.next_group_id.fetch_add(1, Ordering::SeqCst));
            for expense in &mut group.expenses {
                expense.id = ExpenseId::new(self.next_expense_id.fetch_add(1, Ordering::SeqCst));
                expense.expense_group_id = group.id;
            }
            group
        }
    }

    impl DomainPort for MockExpenseGroupPort {}

    #[async_trait]
    impl HealthCheckable for MockExpenseGroupPort {
        async fn health_check(&self) -> HealthCheckResult {
            let mut result = HealthCheckResult::healthy("mock-expense-group-port");
            if self.unavailable.load(Ordering::SeqCst) {
                result.status = core_kernel::AdapterHealth::Unhealthy;
                result.message = Some("Mock adapter marked unavailable".to_string());
            }
            result
        }
    }

    #[async_trait]
    impl ExpenseGroupPort for MockExpenseGroupPort {
        async fn find_expense_groups(
            &self,
            query: &ExpenseGroupQuery,
        ) -> Result<Vec<ExpenseGroup>, PortError> {
            self.check_available()?;
            let groups = self.groups.read().await;
            Ok(query.apply(groups.values().cloned()))
        }

        async fn get_expense_group(
            &self,
            id: ExpenseGroupId,
        ) -> Result<Option<ExpenseGroup>, PortError> {
            self.check_available()?;
            Ok(self.groups.read().await.get(&id).cloned())
        }

        async fn insert_expense_group(
            &self,
            group: ExpenseGroup,
        ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError> {
            self.check_available()?;
            if group.user_id.trim().is_empty() {
                return Ok(RepositoryActionResult::error("userId is required"));
            }

            let stored = self.assign_ids(group);
            debug!(id = %stored.id, "Inserted expense group");
            self.groups.write().await.insert(stored.id, stored.clone());
            Ok(RepositoryActionResult::created(stored))
        }

        async fn update_expense_group(
            &self,
            group: ExpenseGroup,
        ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            self.check_available()?;

            let mut groups = self.groups.write().await;
            let Some(existing) = groups.get_mut(&group.id) else {
                return Ok(RepositoryActionResult::not_found());
            };

            existing.name = group.name;
            existing.description = group.description;
            existing.status = group.status;
            Ok(RepositoryActionResult::updated(existing.clone()))
        }

        async fn delete_expense_group(
            &self,
            id: ExpenseGroupId,
        ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError> {
            self.check_available()?;
            let mut groups = self.groups.write().await;
            if !groups.contains_key(&id) {
                return Ok(RepositoryActionResult::not_found());
            }
            if self.locked.load(Ordering::SeqCst) {
                return Ok(RepositoryActionResult::error("expense group is locked"));
            }
            groups.remove(&id);
            Ok(RepositoryActionResult::deleted())
        }
    }
}
