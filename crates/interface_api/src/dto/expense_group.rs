//! Expense group DTOs
//!
//! The wire format is camelCase JSON. Conversions to and from the domain
//! records are plain field copies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ExpenseGroupId, ExpenseId};
use domain_expense::{Expense, ExpenseGroup, ExpenseGroupStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseGroupDto {
    /// Zero (or absent) in create requests
    #[serde(default)]
    pub id: i32,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ExpenseGroupStatus,
    #[serde(default)]
    pub expenses: Vec<ExpenseDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDto {
    #[serde(default)]
    pub id: i32,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub expense_group_id: i32,
}

impl From<ExpenseGroup> for ExpenseGroupDto {
    fn from(group: ExpenseGroup) -> Self {
        Self {
            id: group.id.value(),
            user_id: group.user_id,
            name: group.name,
            description: group.description,
            status: group.status,
            expenses: group.expenses.into_iter().map(ExpenseDto::from).collect(),
        }
    }
}

impl From<ExpenseGroupDto> for ExpenseGroup {
    fn from(dto: ExpenseGroupDto) -> Self {
        Self {
            id: ExpenseGroupId::new(dto.id),
            user_id: dto.user_id,
            name: dto.name,
            description: dto.description,
            status: dto.status,
            expenses: dto.expenses.into_iter().map(Expense::from).collect(),
        }
    }
}

impl From<Expense> for ExpenseDto {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id.value(),
            description: expense.description,
            date: expense.date,
            amount: expense.amount,
            expense_group_id: expense.expense_group_id.value(),
        }
    }
}

impl From<ExpenseDto> for Expense {
    fn from(dto: ExpenseDto) -> Self {
        Self {
            id: ExpenseId::new(dto.id),
            expense_group_id: ExpenseGroupId::new(dto.expense_group_id),
            description: dto.description,
            date: dto.date,
            amount: dto.amount,
        }
    }
}
