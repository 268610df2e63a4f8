//! HTTP tests for the expense group endpoints
//!
//! The router runs against the in-memory `MockExpenseGroupPort`.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_expense::{ExpenseGroup, MockExpenseGroupPort};
use interface_api::config::ApiConfig;
use interface_api::create_router;
use interface_api::dto::ExpenseGroupDto;
use test_utils::{ExpenseGroupFixtures, RequestFixtures};

const BASE_URL: &str = "http://test.local";

async fn server_with(groups: Vec<ExpenseGroup>) -> (TestServer, Arc<MockExpenseGroupPort>) {
    let port = Arc::new(MockExpenseGroupPort::with_groups(groups).await);
    let config = ApiConfig {
        public_base_url: Some(BASE_URL.to_string()),
        ..ApiConfig::default()
    };
    let server = TestServer::new(create_router(port.clone(), config)).unwrap();
    (server, port)
}

fn pagination(response: &axum_test::TestResponse) -> Value {
    let header = response.header("x-pagination");
    serde_json::from_str(header.to_str().unwrap()).unwrap()
}

fn names(groups: &[ExpenseGroupDto]) -> Vec<&str> {
    groups.iter().map(|g| g.name.as_str()).collect()
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_create_read_patch_delete() {
        let (server, _port) = server_with(Vec::new()).await;

        let created = server
            .post("/api/expensegroups")
            .json(&RequestFixtures::create_body())
            .await;
        created.assert_status(StatusCode::CREATED);
        let dto: ExpenseGroupDto = created.json();
        assert!(dto.id > 0);
        assert_eq!(
            created.header("location").to_str().unwrap(),
            format!("{}/api/expensegroups/{}", BASE_URL, dto.id)
        );
        assert_eq!(dto.expenses.len(), 1);
        assert_eq!(dto.expenses[0].expense_group_id, dto.id);

        let path = format!("/api/expensegroups/{}", dto.id);

        let fetched = server.get(&path).await;
        fetched.assert_status(StatusCode::OK);
        assert_eq!(fetched.json::<ExpenseGroupDto>(), dto);

        let patched = server
            .patch(&path)
            .json(&json!([{"op": "replace", "path": "/status", "value": 2}]))
            .await;
        patched.assert_status(StatusCode::OK);
        let patched: Value = patched.json();
        assert_eq!(patched["status"], 2);
        assert_eq!(patched["name"], "Client dinner");

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_keeps_submitted_content() {
        let (server, _port) = server_with(Vec::new()).await;
        let body = RequestFixtures::create_body();

        let created: Value = server.post("/api/expensegroups").json(&body).await.json();

        assert_eq!(created["userId"], body["userId"]);
        assert_eq!(created["description"], body["description"]);
        assert_eq!(created["expenses"][0]["amount"], "142.50");
        assert_eq!(created["expenses"][0]["date"], "2024-03-05");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_pages_and_links() {
        let (server, _port) = server_with(ExpenseGroupFixtures::numbered(12)).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("page", 2)
            .add_query_param("pageSize", 5)
            .await;
        response.assert_status(StatusCode::OK);

        let body: Vec<ExpenseGroupDto> = response.json();
        assert_eq!(
            names(&body),
            vec!["Group 06", "Group 07", "Group 08", "Group 09", "Group 10"]
        );

        let header = pagination(&response);
        assert_eq!(header["currentPage"], 2);
        assert_eq!(header["pageSize"], 5);
        assert_eq!(header["totalCount"], 12);
        assert_eq!(header["totalPages"], 3);
        assert_eq!(
            header["previousPageLink"],
            "http://test.local/api/expensegroups?sort=id&page=1&pageSize=5"
        );
        assert_eq!(
            header["nextPageLink"],
            "http://test.local/api/expensegroups?sort=id&page=3&pageSize=5"
        );
    }

    #[tokio::test]
    async fn test_default_page_size() {
        let (server, _port) = server_with(ExpenseGroupFixtures::numbered(12)).await;

        let response = server.get("/api/expensegroups").await;

        assert_eq!(response.json::<Vec<ExpenseGroupDto>>().len(), 10);
        let header = pagination(&response);
        assert_eq!(header["previousPageLink"], "");
        assert_eq!(
            header["nextPageLink"],
            "http://test.local/api/expensegroups?sort=id&page=2&pageSize=10"
        );
    }

    #[tokio::test]
    async fn test_page_beyond_the_end_is_empty() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("page", 999)
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.json::<Vec<ExpenseGroupDto>>().is_empty());
        let header = pagination(&response);
        assert_eq!(header["totalCount"], 3);
        assert_eq!(header["totalPages"], 1);
        assert_eq!(header["nextPageLink"], "");
    }

    #[tokio::test]
    async fn test_empty_store_page_999() {
        let (server, _port) = server_with(Vec::new()).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("page", 999)
            .await;

        response.assert_status(StatusCode::OK);
        assert!(response.json::<Vec<ExpenseGroupDto>>().is_empty());
        assert_eq!(pagination(&response)["totalPages"], 0);
    }

    #[tokio::test]
    async fn test_status_filter_is_case_insensitive() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("status", "Confirmed")
            .await;

        let body: Vec<ExpenseGroupDto> = response.json();
        assert_eq!(names(&body), vec!["Conference"]);
        assert!(body.iter().all(|g| g.status.code() == 2));
    }

    #[tokio::test]
    async fn test_unknown_status_returns_everything() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("status", "archived")
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Vec<ExpenseGroupDto>>().len(), 3);
        assert_eq!(
            pagination(&response)["totalCount"],
            3,
            "unknown status names do not filter"
        );
    }

    #[tokio::test]
    async fn test_user_filter_and_sort() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("userId", "alice")
            .add_query_param("sort", "-name")
            .add_query_param("pageSize", 1)
            .await;

        let body: Vec<ExpenseGroupDto> = response.json();
        assert_eq!(names(&body), vec!["Conference"]);
        assert_eq!(
            pagination(&response)["nextPageLink"],
            "http://test.local/api/expensegroups?sort=-name&userId=alice&page=2&pageSize=1"
        );
    }

    #[tokio::test]
    async fn test_multi_key_sort() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let body: Vec<ExpenseGroupDto> = server
            .get("/api/expensegroups")
            .add_query_param("sort", "userId, -status")
            .await
            .json();

        assert_eq!(
            names(&body),
            vec!["Conference", "Antwerp trip", "Office supplies"]
        );
    }

    #[tokio::test]
    async fn test_invalid_query_is_rejected() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        server
            .get("/api/expensegroups")
            .add_query_param("sort", "createdAt")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/api/expensegroups")
            .add_query_param("page", 0)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/api/expensegroups")
            .add_query_param("pageSize", "ten")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let (server, _port) = server_with(ExpenseGroupFixtures::numbered(3)).await;

        let response = server
            .get("/api/expensegroups")
            .add_query_param("pageSize", 5000)
            .await;

        assert_eq!(pagination(&response)["pageSize"], 100);
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn test_missing_or_null_body_is_rejected() {
        let (server, port) = server_with(Vec::new()).await;

        server
            .post("/api/expensegroups")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/expensegroups")
            .json(&Value::Null)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert!(port.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (server, _port) = server_with(Vec::new()).await;

        let mut body = RequestFixtures::create_body();
        body["status"] = json!(7);

        server
            .post("/api/expensegroups")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_repository_rejection_is_bad_request() {
        let (server, port) = server_with(Vec::new()).await;

        let mut body = RequestFixtures::create_body();
        body["userId"] = json!("   ");

        let response = server.post("/api/expensegroups").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().is_empty());
        assert!(port.is_empty().await);
    }
}

mod replace {
    use super::*;

    #[tokio::test]
    async fn test_replace_updates_mutable_fields() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let response = server
            .put("/api/expensegroups/1")
            .json(&RequestFixtures::replace_body(1))
            .await;

        response.assert_status(StatusCode::OK);
        let dto: ExpenseGroupDto = response.json();
        assert_eq!(dto.name, "Renamed group");
        assert_eq!(dto.description, None);
        assert_eq!(dto.status.code(), 2);
        assert_eq!(dto.expenses.len(), 2, "expenses are not replaced");
    }

    #[tokio::test]
    async fn test_body_without_id_takes_path_id() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let mut body = RequestFixtures::replace_body(0);
        body.as_object_mut().unwrap().remove("id");

        let dto: ExpenseGroupDto = server.put("/api/expensegroups/2").json(&body).await.json();
        assert_eq!(dto.id, 2);
        assert_eq!(dto.name, "Renamed group");
    }

    #[tokio::test]
    async fn test_replace_errors() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;

        server
            .put("/api/expensegroups/42")
            .json(&RequestFixtures::replace_body(42))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .put("/api/expensegroups/1")
            .json(&RequestFixtures::replace_body(2))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put("/api/expensegroups/1")
            .json(&Value::Null)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(port.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_changed_expenses_are_rejected() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;
        let stored: Value = server.get("/api/expensegroups/1").await.json();

        let mut body = RequestFixtures::replace_body(1);
        body["expenses"] = json!([stored["expenses"][0]]);
        server
            .put("/api/expensegroups/1")
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(port.update_calls(), 0);

        body["expenses"] = stored["expenses"].clone();
        let dto: ExpenseGroupDto = server.put("/api/expensegroups/1").json(&body).await.json();
        assert_eq!(dto.name, "Renamed group");
        assert_eq!(dto.expenses.len(), 2);
    }
}

mod patch {
    use super::*;

    #[tokio::test]
    async fn test_failed_test_operation_persists_nothing() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;

        let response = server
            .patch("/api/expensegroups/1")
            .json(&json!([
                {"op": "replace", "path": "/name", "value": "Changed"},
                {"op": "test", "path": "/status", "value": 3}
            ]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(port.update_calls(), 0);

        let unchanged: ExpenseGroupDto = server.get("/api/expensegroups/1").await.json();
        assert_eq!(unchanged.name, "Antwerp trip");
    }

    #[tokio::test]
    async fn test_replace_twice_equals_once() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;
        let operations = json!([{"op": "replace", "path": "/name", "value": "X"}]);

        let once: Value = server
            .patch("/api/expensegroups/3")
            .json(&operations)
            .await
            .json();
        let twice: Value = server
            .patch("/api/expensegroups/3")
            .json(&operations)
            .await
            .json();

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_patch_description_operations() {
        let (server, _port) = server_with(ExpenseGroupFixtures::all()).await;

        let dto: ExpenseGroupDto = server
            .patch("/api/expensegroups/1")
            .json(&json!([
                {"op": "copy", "from": "/name", "path": "/description"},
                {"op": "test", "path": "/description", "value": "Antwerp trip"}
            ]))
            .await
            .json();
        assert_eq!(dto.description.as_deref(), Some("Antwerp trip"));

        let dto: ExpenseGroupDto = server
            .patch("/api/expensegroups/1")
            .json(&json!([{"op": "remove", "path": "/description"}]))
            .await
            .json();
        assert_eq!(dto.description, None);
    }

    #[tokio::test]
    async fn test_patch_errors() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;

        server
            .patch("/api/expensegroups/42")
            .json(&json!([{"op": "replace", "path": "/name", "value": "X"}]))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .patch("/api/expensegroups/1")
            .json(&Value::Null)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .patch("/api/expensegroups/1")
            .json(&json!([{"op": "replace", "path": "/id", "value": 9}]))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .patch("/api/expensegroups/1")
            .json(&json!([{"op": "replace", "path": "/userId", "value": "mallory"}]))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .patch("/api/expensegroups/1")
            .json(&json!([{"op": "replace", "path": "/status", "value": 5}]))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .patch("/api/expensegroups/1")
            .json(&json!([{"op": "remove", "path": "/name"}]))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(port.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_expense_operations_are_rejected() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;

        for operations in [
            json!([{
                "op": "add",
                "path": "/expenses/-",
                "value": {"description": "Taxi", "date": "2024-03-06", "amount": "25.00"}
            }]),
            json!([{"op": "replace", "path": "/expenses/0/amount", "value": "1.00"}]),
            json!([{"op": "remove", "path": "/expenses"}]),
        ] {
            server
                .patch("/api/expensegroups/1")
                .json(&operations)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }

        assert_eq!(port.update_calls(), 0);
        let unchanged: ExpenseGroupDto = server.get("/api/expensegroups/1").await.json();
        assert_eq!(unchanged.expenses.len(), 2);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;

        server
            .delete("/api/expensegroups/42")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        assert_eq!(port.len().await, 3);
    }

    #[tokio::test]
    async fn test_rejected_delete_is_bad_request() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;
        port.set_locked(true);

        server
            .delete("/api/expensegroups/1")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(port.len().await, 3);

        port.set_locked(false);
        server
            .delete("/api/expensegroups/1")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_store_failures_are_opaque_500s() {
        let (server, port) = server_with(ExpenseGroupFixtures::all()).await;
        port.set_unavailable(true);

        for response in [
            server.get("/api/expensegroups").await,
            server.get("/api/expensegroups/1").await,
            server
                .post("/api/expensegroups")
                .json(&RequestFixtures::create_body())
                .await,
            server
                .put("/api/expensegroups/1")
                .json(&RequestFixtures::replace_body(1))
                .await,
            server
                .patch("/api/expensegroups/1")
                .json(&json!([{"op": "replace", "path": "/name", "value": "X"}]))
                .await,
            server.delete("/api/expensegroups/1").await,
        ] {
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            assert!(response.text().is_empty());
        }
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_and_readiness() {
        let (server, port) = server_with(Vec::new()).await;

        let health: Value = server.get("/health").await.json();
        assert_eq!(health["status"], "healthy");

        server.get("/health/ready").await.assert_status(StatusCode::OK);

        port.set_unavailable(true);
        server
            .get("/health/ready")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let (server, _port) = server_with(Vec::new()).await;

        let response = server.get("/api/expensegroups").await;

        assert!(!response.header("x-request-id").is_empty());
    }
}
