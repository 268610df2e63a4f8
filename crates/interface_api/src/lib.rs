//! HTTP API Layer
//!
//! This crate provides the REST API for expense groups using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for expense groups and health checks
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: The camelCase JSON wire format
//! - **Patch / Pagination**: JSON Patch engine and the `X-Pagination` header
//! - **Error Handling**: Status-code-only error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let port = Arc::new(PostgresExpenseGroupAdapter::new(pool));
//! let app = create_router(port, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod patch;
pub mod pagination;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_expense::ExpenseGroupPort;

use crate::config::ApiConfig;
use crate::handlers::{expense_groups, health};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub expense_groups: Arc<dyn ExpenseGroupPort>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `expense_groups` - Expense group store (PostgreSQL adapter or in-memory mock)
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(expense_groups: Arc<dyn ExpenseGroupPort>, config: ApiConfig) -> Router {
    let state = AppState {
        expense_groups,
        config,
    };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let expense_group_routes = Router::new()
        .route(
            "/",
            get(expense_groups::list_expense_groups).post(expense_groups::create_expense_group),
        )
        .route(
            "/:id",
            get(expense_groups::get_expense_group)
                .put(expense_groups::replace_expense_group)
                .patch(expense_groups::patch_expense_group)
                .delete(expense_groups::delete_expense_group),
        );

    let api_routes = Router::new()
        .nest("/expensegroups", expense_group_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([
                    HeaderName::from_static(pagination::PAGINATION_HEADER),
                    axum::http::header::LOCATION,
                ]),
        )
        .with_state(state)
}
