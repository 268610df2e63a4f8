//! API error handling
//!
//! Error responses carry a status code and no body. The cause of a 500 is
//! logged and never returned to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::PortError;
use domain_expense::DomainError;

use crate::patch::PatchError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(cause) => error!(%cause, "Request failed"),
            ApiError::BadRequest(reason) => warn!(%reason, "Request rejected"),
            ApiError::NotFound(_) => {}
        }

        self.status_code().into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<PatchError> for ApiError {
    fn from(err: PatchError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
