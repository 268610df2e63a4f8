//! List query composition: sorting and filtering
//!
//! A sort expression is a comma-separated list of field names, each optionally
//! prefixed with `-` for descending order, e.g. `status,-name`. Field names are
//! matched case-insensitively against the external (camelCase) field names.
//!
//! Filters are optional and AND-combined. The same [`ExpenseGroupQuery`] is
//! rendered to SQL by the PostgreSQL adapter and evaluated in memory by
//! [`ExpenseGroupQuery::apply`].
//!
//! Text keys compare byte-wise in memory, whereas PostgreSQL orders them by
//! the database collation. The two agree on NULL placement and on ASCII text
//! of uniform case, and may differ otherwise (`"Banana"` and `"apple"`).

use std::cmp::Ordering;

use crate::error::DomainError;
use crate::expense_group::{ExpenseGroup, ExpenseGroupStatus};

/// A field an expense group list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    UserId,
    Name,
    Description,
    Status,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "id" => Some(SortField::Id),
            "userid" => Some(SortField::UserId),
            "name" => Some(SortField::Name),
            "description" => Some(SortField::Description),
            "status" => Some(SortField::Status),
            _ => None,
        }
    }

    /// Column holding this field in the `expense_groups` table
    pub const fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::UserId => "user_id",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Status => "status",
        }
    }

    fn compare(self, a: &ExpenseGroup, b: &ExpenseGroup) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::UserId => a.user_id.cmp(&b.user_id),
            SortField::Name => a.name.cmp(&b.name),
            // NULLs sort last ascending, matching PostgreSQL's default
            SortField::Description => match (&a.description, &b.description) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::Status => a.status.cmp(&b.status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// SQL keyword for this direction
    pub const fn keyword(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// One component of a sort expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Ordered list of sort keys
///
/// Ties left by every key are broken by ascending id so paging is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    keys: Vec<SortKey>,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            keys: vec![SortKey {
                field: SortField::Id,
                direction: SortDirection::Ascending,
            }],
        }
    }
}

impl SortOrder {
    /// Parses a sort expression such as `"status,-name"`.
    ///
    /// Blank segments are skipped; an expression with no keys at all yields
    /// the default order (ascending id).
    pub fn parse(expression: &str) -> Result<Self, DomainError> {
        let mut keys = Vec::new();

        for segment in expression.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (direction, name) = match segment.strip_prefix('-') {
                Some(rest) => (SortDirection::Descending, rest.trim()),
                None => (SortDirection::Ascending, segment),
            };

            let field = SortField::parse(name)
                .ok_or_else(|| DomainError::UnknownSortField(name.to_string()))?;
            keys.push(SortKey { field, direction });
        }

        if keys.is_empty() {
            return Ok(Self::default());
        }

        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Compares two groups by every key in turn, then by id
    pub fn compare(&self, a: &ExpenseGroup, b: &ExpenseGroup) -> Ordering {
        self.keys
            .iter()
            .map(|key| {
                let ordering = key.field.compare(a, b);
                match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

/// Parameters for listing expense groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseGroupQuery {
    pub sort: SortOrder,
    /// Only groups with this status; `None` means every status
    pub status: Option<ExpenseGroupStatus>,
    /// Only groups owned by this user; `None` means every user
    pub user_id: Option<String>,
}

impl ExpenseGroupQuery {
    pub fn new(sort: SortOrder) -> Self {
        Self {
            sort,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Option<ExpenseGroupStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Returns true if the group passes every filter
    pub fn matches(&self, group: &ExpenseGroup) -> bool {
        self.status.map_or(true, |status| group.status == status)
            && self
                .user_id
                .as_deref()
                .map_or(true, |user_id| group.user_id == user_id)
    }

    /// Filters and orders the groups in memory
    pub fn apply(&self, groups: impl IntoIterator<Item = ExpenseGroup>) -> Vec<ExpenseGroup> {
        let mut matched: Vec<ExpenseGroup> =
            groups.into_iter().filter(|g| self.matches(g)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_id() {
        assert_eq!(SortOrder::parse("").unwrap(), SortOrder::default());
        assert_eq!(SortOrder::parse(" , ").unwrap(), SortOrder::default());
    }

    #[test]
    fn test_parse_multiple_keys() {
        let order = SortOrder::parse("Status, -name").unwrap();
        assert_eq!(
            order.keys(),
            &[
                SortKey { field: SortField::Status, direction: SortDirection::Ascending },
                SortKey { field: SortField::Name, direction: SortDirection::Descending },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        assert_eq!(
            SortOrder::parse("id,amount"),
            Err(DomainError::UnknownSortField("amount".to_string()))
        );
    }

    #[test]
    fn test_in_memory_text_order_is_bytewise() {
        let apple = ExpenseGroup::new("u1", "apple", ExpenseGroupStatus::Open);
        let banana = ExpenseGroup::new("u1", "Banana", ExpenseGroupStatus::Open);

        assert_eq!(SortField::Name.compare(&banana, &apple), Ordering::Less);
    }

    #[test]
    fn test_column_names() {
        assert_eq!(SortField::UserId.column(), "user_id");
        assert_eq!(SortDirection::Descending.keyword(), "DESC");
    }
}
