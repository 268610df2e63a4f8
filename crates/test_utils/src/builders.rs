//! Test Data Builders
//!
//! Builders for expense groups and expenses. Tests set only the fields they
//! care about; `random()` fills the rest with fake data.

use chrono::NaiveDate;
use core_kernel::{ExpenseGroupId, ExpenseId};
use domain_expense::{Expense, ExpenseGroup, ExpenseGroupStatus};
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::Sentence;
use fake::faker::internet::en::Username;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{DateFixtures, UserFixtures};

/// Builder for constructing expense groups
#[derive(Debug, Clone)]
pub struct ExpenseGroupBuilder {
    id: ExpenseGroupId,
    user_id: String,
    name: String,
    description: Option<String>,
    status: ExpenseGroupStatus,
    expenses: Vec<Expense>,
}

impl Default for ExpenseGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseGroupBuilder {
    /// Creates a new builder with fixed default values
    pub fn new() -> Self {
        Self {
            id: ExpenseGroupId::default(),
            user_id: UserFixtures::alice().to_string(),
            name: "Expense group".to_string(),
            description: None,
            status: ExpenseGroupStatus::Open,
            expenses: Vec::new(),
        }
    }

    /// Creates a builder populated with fake data
    pub fn random() -> Self {
        let name: String = CatchPhrase().fake();
        let description: String = Sentence(3..8).fake();
        let user_id: String = Username().fake();
        let status_index = (0..ExpenseGroupStatus::ALL.len()).fake::<usize>();

        Self {
            user_id,
            name,
            description: Some(description),
            status: ExpenseGroupStatus::ALL[status_index],
            ..Self::new()
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = ExpenseGroupId::new(id);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }

    pub fn with_status(mut self, status: ExpenseGroupStatus) -> Self {
        self.status = status;
        self
    }

    /// Appends an expense line item
    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    /// Appends `count` randomly generated expense line items
    pub fn with_random_expenses(mut self, count: usize) -> Self {
        self.expenses
            .extend((0..count).map(|_| ExpenseBuilder::random().build()));
        self
    }

    /// Builds the expense group
    pub fn build(self) -> ExpenseGroup {
        let id = self.id;
        ExpenseGroup {
            id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            status: self.status,
            expenses: self
                .expenses
                .into_iter()
                .map(|expense| Expense {
                    expense_group_id: id,
                    ..expense
                })
                .collect(),
        }
    }
}

/// Builder for constructing expense line items
#[derive(Debug, Clone)]
pub struct ExpenseBuilder {
    description: String,
    date: NaiveDate,
    amount: Decimal,
}

impl Default for ExpenseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseBuilder {
    /// Creates a new builder with fixed default values
    pub fn new() -> Self {
        Self {
            description: "Taxi".to_string(),
            date: DateFixtures::trip_start(),
            amount: dec!(25.00),
        }
    }

    /// Creates a builder populated with fake data
    pub fn random() -> Self {
        let description: String = Sentence(1..4).fake();
        let cents = (100..500_000i64).fake::<i64>();
        let offset = (0..365i64).fake::<i64>();

        Self {
            description,
            date: DateFixtures::trip_start() + chrono::Duration::days(offset),
            amount: Decimal::new(cents, 2),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Builds an unsaved expense
    pub fn build(self) -> Expense {
        Expense {
            id: ExpenseId::default(),
            expense_group_id: ExpenseGroupId::default(),
            description: self.description,
            date: self.date,
            amount: self.amount,
        }
    }
}
