use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Body returned for every classification failure, whatever the cause.
pub const CLASSIFY_FAILURE_MESSAGE: &str = "Failed to classify wallet";

#[derive(Debug)]
pub enum AppError {
    /// Upstream answered with a non-2xx status.
    Upstream(u16),
    /// Upstream could not be reached or the transfer broke.
    Network(String),
    /// Upstream answered 2xx but the body was not the expected JSON.
    DeserializationError(String),
    InvalidAddress(String),
    NotFound(String),
    BadRequest(String),
    ConfigurationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upstream(status) => {
                write!(f, "Backend API responded with status: {}", status)
            }
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            AppError::InvalidAddress(addr) => write!(f, "Invalid Ethereum address: {}", addr),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Upstream(_) | AppError::Network(_) | AppError::DeserializationError(_) => {
                tracing::error!("Error proxying request to backend: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CLASSIFY_FAILURE_MESSAGE.to_string(),
                )
            }
            AppError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ConfigurationError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::Upstream(status.as_u16()),
            None if err.is_decode() => AppError::DeserializationError(err.to_string()),
            None => AppError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::DeserializationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_upstream_failure_hides_cause() {
        let response = AppError::Upstream(502).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": CLASSIFY_FAILURE_MESSAGE }));
    }

    #[tokio::test]
    async fn test_invalid_address_is_bad_request() {
        let response = AppError::InvalidAddress("0x1".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
