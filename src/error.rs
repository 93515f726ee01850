//! Shop Error Taxonomy
//!
//! Every failure a node can report to a client is one of these variants. Each
//! variant maps to exactly one HTTP status and is rendered through the shared
//! [`ApiResponse`] envelope, so handlers can return `Result<_, ShopError>` and
//! let Axum turn failures into structured JSON.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::protocol::ApiResponse;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShopError {
    /// Unknown book id, topic or order id.
    #[error("{0}")]
    NotFound(String),

    /// Malformed payload, non-positive price, non-integer delta.
    #[error("{0}")]
    Validation(String),

    /// Out of stock, stock would go negative.
    #[error("{0}")]
    BusinessRule(String),

    /// Downstream timeout or connection failure.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// `/sync` received an operation kind it does not know.
    #[error("Unknown operation: {0}")]
    UnrecognizedSyncOperation(String),

    /// Raised while wiring a node, never over HTTP.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::NotFound(_) => StatusCode::NOT_FOUND,
            ShopError::Validation(_)
            | ShopError::BusinessRule(_)
            | ShopError::UnrecognizedSyncOperation(_) => StatusCode::BAD_REQUEST,
            ShopError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ShopError::InvalidConfig(_) | ShopError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for ShopError {
    fn from(rejection: JsonRejection) -> Self {
        ShopError::Validation(format!("Invalid request: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ShopError {
    fn from(rejection: PathRejection) -> Self {
        ShopError::Validation(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<reqwest::Error> for ShopError {
    fn from(err: reqwest::Error) -> Self {
        ShopError::ServiceUnavailable(err.to_string())
    }
}

pub type ShopResult<T> = Result<T, ShopError>;
