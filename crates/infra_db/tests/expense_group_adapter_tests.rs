//! PostgreSQL adapter tests
//!
//! These tests start a PostgreSQL container through testcontainers and are
//! ignored by default. Run them with `cargo test -p infra_db -- --ignored`.

use core_kernel::{ExpenseGroupId, HealthCheckable};
use domain_expense::{
    ExpenseGroupPort, ExpenseGroupQuery, ExpenseGroupStatus, RepositoryActionStatus, SortOrder,
};
use infra_db::adapters::PostgresExpenseGroupAdapter;
use rust_decimal_macros::dec;
use test_utils::{
    assert_all_match, assert_same_content, assert_sorted_by, create_isolated_test_database,
    get_shared_test_database, ExpenseGroupBuilder, ExpenseGroupFixtures, TestDatabase,
};

async fn seeded() -> (TestDatabase, PostgresExpenseGroupAdapter) {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    let adapter = PostgresExpenseGroupAdapter::new(db.pool().clone());

    for group in ExpenseGroupFixtures::all() {
        let result = adapter.insert_expense_group(group).await.unwrap();
        assert_eq!(result.status(), RepositoryActionStatus::Created);
    }

    (db, adapter)
}

mod reads {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_get_returns_group_with_expenses() {
        let (_db, adapter) = seeded().await;

        let group = adapter
            .get_expense_group(ExpenseGroupId::new(1))
            .await
            .unwrap()
            .expect("group 1 exists");

        assert_same_content(&group, &ExpenseGroupFixtures::antwerp_trip());
        assert!(group
            .expenses
            .iter()
            .all(|e| e.expense_group_id == group.id && !e.id.is_unassigned()));
        assert_eq!(group.total_amount(), dec!(396.40));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_get_missing_returns_none() {
        let (_db, adapter) = seeded().await;

        let missing = adapter
            .get_expense_group(ExpenseGroupId::new(999))
            .await
            .unwrap();

        assert!(missing.is_none());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_find_filters_and_sorts() {
        let (_db, adapter) = seeded().await;

        let query = ExpenseGroupQuery::new(SortOrder::parse("-name").unwrap())
            .with_user_id(Some("alice".to_string()));
        let groups = adapter.find_expense_groups(&query).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_all_match(&groups, &query);
        assert_sorted_by(&groups, &query.sort);
        assert_eq!(groups[0].name, "Conference");
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_find_sorts_missing_descriptions_like_memory() {
        let (_db, adapter) = seeded().await;
        adapter
            .insert_expense_group(ExpenseGroupBuilder::random().without_description().build())
            .await
            .unwrap();

        for expression in ["description", "-description", "status,-description"] {
            let query = ExpenseGroupQuery::new(SortOrder::parse(expression).unwrap());
            let from_db = adapter.find_expense_groups(&query).await.unwrap();
            let in_memory = query.apply(from_db.clone());
            assert_eq!(from_db, in_memory, "ordering differs for {}", expression);
        }
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_find_by_status() {
        let (_db, adapter) = seeded().await;

        let query = ExpenseGroupQuery::default().with_status(Some(ExpenseGroupStatus::Processed));
        let groups = adapter.find_expense_groups(&query).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Office supplies");
    }
}

mod writes {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_insert_rejects_blank_user() {
        let (db, adapter) = seeded().await;

        let result = adapter
            .insert_expense_group(ExpenseGroupBuilder::new().with_user_id("  ").build())
            .await
            .unwrap();

        assert_eq!(result.status(), RepositoryActionStatus::Error);
        assert!(result.message().is_some());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expense_groups")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_update_keeps_owner_and_expenses() {
        let (_db, adapter) = seeded().await;

        let mut group = adapter
            .get_expense_group(ExpenseGroupId::new(1))
            .await
            .unwrap()
            .unwrap();
        group.name = "Antwerp + Ghent".to_string();
        group.status = ExpenseGroupStatus::Confirmed;
        group.user_id = "mallory".to_string();
        group.expenses.clear();

        let result = adapter.update_expense_group(group).await.unwrap();
        assert_eq!(result.status(), RepositoryActionStatus::Updated);

        let updated = result.into_entity().unwrap();
        assert_eq!(updated.name, "Antwerp + Ghent");
        assert_eq!(updated.status, ExpenseGroupStatus::Confirmed);
        assert_eq!(updated.user_id, "alice");
        assert_eq!(updated.expenses.len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_update_missing_reports_not_found() {
        let (_db, adapter) = seeded().await;

        let result = adapter
            .update_expense_group(ExpenseGroupBuilder::new().with_id(42).build())
            .await
            .unwrap();

        assert_eq!(result.status(), RepositoryActionStatus::NotFound);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_delete_cascades_to_expenses() {
        let (db, adapter) = seeded().await;

        let deleted = adapter
            .delete_expense_group(ExpenseGroupId::new(1))
            .await
            .unwrap();
        assert_eq!(deleted.status(), RepositoryActionStatus::Deleted);

        let again = adapter
            .delete_expense_group(ExpenseGroupId::new(1))
            .await
            .unwrap();
        assert_eq!(again.status(), RepositoryActionStatus::NotFound);

        let orphans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE expense_group_id = 1")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(orphans, 0);
    }
}

mod shared {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_clear_data_restarts_ids() {
        let db = get_shared_test_database().await;
        let adapter = PostgresExpenseGroupAdapter::new(db.pool().clone());

        adapter
            .insert_expense_group(ExpenseGroupFixtures::conference())
            .await
            .unwrap();
        db.clear_data().await.expect("Failed to clear test data");

        let query = ExpenseGroupQuery::default();
        assert!(adapter.find_expense_groups(&query).await.unwrap().is_empty());

        let created = adapter
            .insert_expense_group(ExpenseGroupFixtures::antwerp_trip())
            .await
            .unwrap()
            .into_entity()
            .unwrap();
        assert_eq!(created.id, ExpenseGroupId::new(1));
        assert_eq!(created.expenses[0].id.value(), 1);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_health_check_reports_healthy() {
        let (_db, adapter) = seeded().await;

        let health = adapter.health_check().await;

        assert!(health.status.is_operational());
        assert!(health.message.is_none());
    }
}
