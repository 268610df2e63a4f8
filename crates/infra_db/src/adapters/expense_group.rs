//! PostgreSQL Expense Group Adapter
//!
//! This module provides the internal (database) adapter for the expense
//! domain, implementing `ExpenseGroupPort` on top of `ExpenseGroupRepository`.
//!
//! # Error Handling
//!
//! Database errors are translated as follows:
//! - Constraint violations on writes -> `RepositoryActionResult::error`
//! - Connection failures and pool exhaustion -> `PortError::Connection`
//! - Undecodable rows -> `PortError::Transformation`
//! - Anything else -> `PortError::Internal`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresExpenseGroupAdapter;
//! use domain_expense::ExpenseGroupPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ExpenseGroupPort> = Arc::new(PostgresExpenseGroupAdapter::new(pool));
//! let group = port.get_expense_group(id).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, DomainPort, ExpenseGroupId, ExpenseId, HealthCheckResult, HealthCheckable,
    PortError,
};
use domain_expense::{
    Expense, ExpenseGroup, ExpenseGroupPort, ExpenseGroupQuery, ExpenseGroupStatus,
    RepositoryActionResult,
};

use crate::error::DatabaseError;
use crate::repositories::expense_group::{
    status_code, ExpenseGroupChanges, ExpenseGroupRepository, ExpenseGroupRow, ExpenseRow,
    NewExpense, NewExpenseGroup,
};

const ADAPTER_ID: &str = "postgres-expense-group-adapter";

/// PostgreSQL-backed implementation of the ExpenseGroupPort trait
#[derive(Debug, Clone)]
pub struct PostgresExpenseGroupAdapter {
    repository: ExpenseGroupRepository,
    pool: PgPool,
}

impl PostgresExpenseGroupAdapter {
    /// Creates a new PostgreSQL expense group adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ExpenseGroupRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ExpenseGroupRepository {
        &self.repository
    }

    /// Loads the expenses of `rows` and assembles domain groups, keeping
    /// the row order
    async fn assemble(&self, rows: Vec<ExpenseGroupRow>) -> Result<Vec<ExpenseGroup>, PortError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let expense_rows = self
            .repository
            .expenses_for(&ids)
            .await
            .map_err(db_to_port_error)?;

        let mut by_group: HashMap<i32, Vec<ExpenseRow>> = HashMap::new();
        for expense in expense_rows {
            by_group.entry(expense.expense_group_id).or_default().push(expense);
        }

        rows.into_iter()
            .map(|row| {
                let expenses = by_group.remove(&row.id).unwrap_or_default();
                row_to_expense_group(row, expenses)
            })
            .collect()
    }
}

impl DomainPort for PostgresExpenseGroupAdapter {}

#[async_trait]
impl HealthCheckable for PostgresExpenseGroupAdapter {
    /// Performs a `SELECT 1` to verify the pool can reach the database
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl ExpenseGroupPort for PostgresExpenseGroupAdapter {
    #[instrument(skip(self))]
    async fn find_expense_groups(
        &self,
        query: &ExpenseGroupQuery,
    ) -> Result<Vec<ExpenseGroup>, PortError> {
        let rows = self.repository.list(query).await.map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Fetched expense group rows");
        self.assemble(rows).await
    }

    #[instrument(skip(self), fields(expense_group_id = %id))]
    async fn get_expense_group(
        &self,
        id: ExpenseGroupId,
    ) -> Result<Option<ExpenseGroup>, PortError> {
        let Some(row) = self
            .repository
            .get_by_id(id.value())
            .await
            .map_err(db_to_port_error)?
        else {
            return Ok(None);
        };

        Ok(self.assemble(vec![row]).await?.pop())
    }

    #[instrument(skip(self, group), fields(user_id = %group.user_id))]
    async fn insert_expense_group(
        &self,
        group: ExpenseGroup,
    ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError> {
        let new_group = NewExpenseGroup {
            user_id: group.user_id,
            name: group.name,
            description: group.description,
            status: status_code(group.status.code()),
            expenses: group
                .expenses
                .into_iter()
                .map(|e| NewExpense {
                    description: e.description,
                    date: e.date,
                    amount: e.amount,
                })
                .collect(),
        };

        match self.repository.insert(new_group).await {
            Ok((row, expenses)) => {
                row_to_expense_group(row, expenses).map(RepositoryActionResult::created)
            }
            Err(e) if e.is_constraint_violation() => {
                warn!(error = %e, "Insert rejected by database constraint");
                Ok(RepositoryActionResult::error(e.to_string()))
            }
            Err(e) => Err(db_to_port_error(e)),
        }
    }

    #[instrument(skip(self, group), fields(expense_group_id = %group.id))]
    async fn update_expense_group(
        &self,
        group: ExpenseGroup,
    ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError> {
        let changes = ExpenseGroupChanges {
            name: group.name,
            description: group.description,
            status: status_code(group.status.code()),
        };

        let row = match self.repository.update(group.id.value(), changes).await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(RepositoryActionResult::not_found()),
            Err(e) if e.is_constraint_violation() => {
                warn!(error = %e, "Update rejected by database constraint");
                return Ok(RepositoryActionResult::error(e.to_string()));
            }
            Err(e) => return Err(db_to_port_error(e)),
        };

        let updated = self.assemble(vec![row]).await?.pop();
        Ok(updated.map_or_else(RepositoryActionResult::not_found, RepositoryActionResult::updated))
    }

    #[instrument(skip(self), fields(expense_group_id = %id))]
    async fn delete_expense_group(
        &self,
        id: ExpenseGroupId,
    ) -> Result<RepositoryActionResult<ExpenseGroup>, PortError> {
        match self.repository.delete(id.value()).await {
            Ok(true) => Ok(RepositoryActionResult::deleted()),
            Ok(false) => Ok(RepositoryActionResult::not_found()),
            Err(e) if e.is_constraint_violation() => {
                warn!(error = %e, "Delete rejected by database constraint");
                Ok(RepositoryActionResult::error(e.to_string()))
            }
            Err(e) => Err(db_to_port_error(e)),
        }
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts a database error to a port error
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(msg) => PortError::not_found("ExpenseGroup", msg),
        DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => {
            PortError::connection(e.to_string())
        }
        DatabaseError::SerializationError(msg) => PortError::transformation(msg),
        other => PortError::internal_with_source("Expense group query failed", other),
    }
}

/// Converts a group row and its expense rows to a domain ExpenseGroup
fn row_to_expense_group(
    row: ExpenseGroupRow,
    expenses: Vec<ExpenseRow>,
) -> Result<ExpenseGroup, PortError> {
    let status = ExpenseGroupStatus::try_from(i32::from(row.status))
        .map_err(|e| PortError::transformation(format!("expense group {}: {}", row.id, e)))?;

    Ok(ExpenseGroup {
        id: ExpenseGroupId::new(row.id),
        user_id: row.user_id,
        name: row.name,
        description: row.description,
        status,
        expenses: expenses.into_iter().map(row_to_expense).collect(),
    })
}

fn row_to_expense(row: ExpenseRow) -> Expense {
    Expense {
        id: ExpenseId::new(row.id),
        expense_group_id: ExpenseGroupId::new(row.expense_group_id),
        description: row.description,
        date: row.date,
        amount: row.amount,
    }
}
