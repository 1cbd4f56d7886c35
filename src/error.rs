//! Unified error types for the API.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error returned by request handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// The addressed record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request failed boundary validation.
    #[error("{0}")]
    Validation(String),

    /// The store did not accept an insert.
    #[error("Insert failed")]
    InsertFailed,

    /// Any other document store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Driver-level MongoDB error.
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A record with the same primary key already exists.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The store did not acknowledge a write.
    #[error("write not acknowledged")]
    Unacknowledged,

    /// A record could not be mapped to or from its stored shape.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InsertFailed | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Store(e) => {
                error!("Store operation failed: {e}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            self.status_code(),
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
