use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::StoreError;
use crate::models::ValidationError;

/// Every failure a handler can report. Each maps to one status code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed body or an unparseable path/query value.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// A hotel refers to a destination that does not exist.
    #[error("Destination not found: {0}")]
    InvalidReference(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Server error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::InvalidReference(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, error) = match self {
            AppError::Validation(detail) => ("Validation error".to_string(), detail.clone()),
            AppError::BadRequest(detail) => ("Invalid request".to_string(), detail.clone()),
            AppError::PayloadTooLarge(detail) => {
                ("Payload too large".to_string(), detail.clone())
            }
            AppError::InvalidReference(id) => (
                "Destination not found".to_string(),
                format!("destination {id} does not exist"),
            ),
            AppError::NotFound { kind, id } => (
                format!("{} not found", capitalize(kind)),
                format!("no {kind} with id {id}"),
            ),
            AppError::Internal(detail) => ("Server error".to_string(), detail.clone()),
        };
        ErrorBody { message, error }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => AppError::Validation(e.to_string()),
            StoreError::NotFound { kind, id } => AppError::NotFound { kind, id },
            StoreError::InvalidReference(id) => AppError::InvalidReference(id),
            StoreError::Database(e) => AppError::Internal(e.to_string()),
            StoreError::Corrupt(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status, Json(self.body())).into_response()
    }
}
