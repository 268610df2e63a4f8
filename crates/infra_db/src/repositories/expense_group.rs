//! Expense group repository implementation
//!
//! This module provides database access for expense groups and their
//! expense line items. Groups live in `expense_groups`; line items live in
//! `expenses` and are removed with their group through `ON DELETE CASCADE`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use domain_expense::ExpenseGroupQuery;

use crate::error::DatabaseError;

const GROUP_COLUMNS: &str = "id, user_id, name, description, status";
const EXPENSE_COLUMNS: &str = "id, expense_group_id, description, date, amount";

/// Repository for expense group data
#[derive(Debug, Clone)]
pub struct ExpenseGroupRepository {
    pool: PgPool,
}

impl ExpenseGroupRepository {
    /// Creates a new ExpenseGroupRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists groups matching the query's filters, ordered by its sort keys
    ///
    /// Sort columns come from a fixed whitelist, so they are pushed into the
    /// statement as SQL text; filter values are bound.
    pub async fn list(&self, query: &ExpenseGroupQuery) -> Result<Vec<ExpenseGroupRow>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(GROUP_COLUMNS);
        builder.push(" FROM expense_groups WHERE TRUE");

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status_code(status.code()));
        }
        if let Some(user_id) = &query.user_id {
            builder.push(" AND user_id = ").push_bind(user_id.clone());
        }

        builder.push(" ORDER BY ");
        for key in query.sort.keys() {
            builder
                .push(key.field.column())
                .push(" ")
                .push(key.direction.keyword())
                .push(", ");
        }
        builder.push("id ASC");

        debug!(sql = builder.sql(), "Listing expense groups");

        let rows = builder
            .build_query_as::<ExpenseGroupRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Retrieves a group row by id
    pub async fn get_by_id(&self, id: i32) -> Result<Option<ExpenseGroupRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ExpenseGroupRow>(&format!(
            "SELECT {GROUP_COLUMNS} FROM expense_groups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Retrieves the expenses of the given groups, ordered by id
    pub async fn expenses_for(&self, group_ids: &[i32]) -> Result<Vec<ExpenseRow>, DatabaseError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE expense_group_id = ANY($1) ORDER BY id"
        ))
        .bind(group_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a group and its expenses in one transaction
    ///
    /// # Returns
    ///
    /// The stored group row and the stored expense rows with their new ids
    pub async fn insert(
        &self,
        group: NewExpenseGroup,
    ) -> Result<(ExpenseGroupRow, Vec<ExpenseRow>), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ExpenseGroupRow>(&format!(
            "INSERT INTO expense_groups (user_id, name, description, status) \
             VALUES ($1, $2, $3, $4) RETURNING {GROUP_COLUMNS}"
        ))
        .bind(&group.user_id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.status)
        .fetch_one(&mut *tx)
        .await?;

        let mut expenses = Vec::with_capacity(group.expenses.len());
        for expense in &group.expenses {
            let expense_row = sqlx::query_as::<_, ExpenseRow>(&format!(
                "INSERT INTO expenses (expense_group_id, description, date, amount) \
                 VALUES ($1, $2, $3, $4) RETURNING {EXPENSE_COLUMNS}"
            ))
            .bind(row.id)
            .bind(&expense.description)
            .bind(expense.date)
            .bind(expense.amount)
            .fetch_one(&mut *tx)
            .await?;
            expenses.push(expense_row);
        }

        tx.commit().await?;
        debug!(id = row.id, expenses = expenses.len(), "Inserted expense group");

        Ok((row, expenses))
    }

    /// Overwrites the mutable columns of a group
    ///
    /// # Returns
    ///
    /// The updated row, or `None` if no group has that id
    pub async fn update(
        &self,
        id: i32,
        changes: ExpenseGroupChanges,
    ) -> Result<Option<ExpenseGroupRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ExpenseGroupRow>(&format!(
            "UPDATE expense_groups SET name = $2, description = $3, status = $4 \
             WHERE id = $1 RETURNING {GROUP_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Deletes a group and, by cascade, its expenses
    ///
    /// # Returns
    ///
    /// `true` if a row was removed
    pub async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM expense_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Narrows a domain status code to the `SMALLINT` column type
///
/// Status codes are 1..=3, so the narrowing never truncates.
pub fn status_code(code: i32) -> i16 {
    i16::try_from(code).unwrap_or(i16::MAX)
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for an expense group
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpenseGroupRow {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: i16,
}

/// Database row for an expense line item
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExpenseRow {
    pub id: i32,
    pub expense_group_id: i32,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Data for inserting a group
#[derive(Debug, Clone)]
pub struct NewExpenseGroup {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: i16,
    pub expenses: Vec<NewExpense>,
}

/// Data for inserting an expense line item
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Columns an update may change
#[derive(Debug, Clone)]
pub struct ExpenseGroupChanges {
    pub name: String,
    pub description: Option<String>,
    pub status: i16,
}
