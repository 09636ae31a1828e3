//! Request extraction that reports failures in the API's error format.

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::error::AppError;

/// A JSON request body. Malformed JSON, or a missing `Content-Type`, becomes
/// an [`AppError::BadRequest`] instead of axum's plain-text rejection; a body
/// over the size limit becomes [`AppError::PayloadTooLarge`].
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(AppError::PayloadTooLarge(rejection.body_text()))
            }
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// Treats absent and blank query values the same way.
pub fn present(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parses a decimal input, rejecting NaN and infinities.
pub fn parse_number(name: &str, raw: &str) -> Result<f64, AppError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AppError::BadRequest(format!(
            "{name} must be a number, got '{raw}'"
        ))),
    }
}

pub fn parse_integer(name: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim().parse::<i64>().map_err(|_| {
        AppError::BadRequest(format!("{name} must be a whole number, got '{raw}'"))
    })
}
