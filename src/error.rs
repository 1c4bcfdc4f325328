use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::model::leave_request::LeaveStatus;
use crate::store::StoreError;

/// Every failure a handler can surface. The HTTP mapping lives here so the
/// engine and stores never reason about status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// The request left PENDING before this caller's decision landed.
    #[error("leave request already processed (current status: {current})")]
    AlreadyDecided { current: LeaveStatus },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Infrastructure failure (database, hashing, token signing). The detail
    /// is logged server-side and never echoed to the client.
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl ApiError {
    fn public_message(&self) -> String {
        match self {
            ApiError::Dependency(detail) => {
                error!(error = %detail, "request failed on a dependency");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyDecided { .. } => StatusCode::CONFLICT,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.public_message() }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Record".into()),
            StoreError::AlreadyDecided { current } => ApiError::AlreadyDecided { current },
            StoreError::Duplicate => ApiError::Validation("Record already exists".into()),
            StoreError::Unavailable(detail) => ApiError::Dependency(detail),
        }
    }
}
