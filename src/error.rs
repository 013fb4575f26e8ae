//! API error taxonomy and response mapping.
//!
//! Handlers log and count their errors before returning them; this module
//! only translates an error into a status code and JSON body. Unhandled
//! faults (panics) never pass through here; the catch-panic boundary in the
//! server owns those.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::middleware::CorrelationId;

/// Classified request failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiErrorKind {
    /// Malformed or out-of-range request parameters.
    #[error("{0}")]
    Validation(String),

    /// Requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Anything the service cannot attribute to the caller.
    #[error("{0}")]
    Internal(String),
}

/// Error returned from API handlers, carrying the request's correlation ID
/// so operators can match the response to its log records.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub correlation_id: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Validation(message.into()),
            correlation_id: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::NotFound(message.into()),
            correlation_id: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Internal(message.into()),
            correlation_id: None,
        }
    }

    pub fn with_correlation(mut self, correlation_id: &CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id.as_str().to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ApiErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_label(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::Validation(_) => "validation_error",
            ApiErrorKind::NotFound(_) => "not_found",
            ApiErrorKind::Internal(_) => "internal_error",
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.error_label().to_string(),
            message: self.kind.to_string(),
            correlation_id: self.correlation_id,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_carries_correlation_id() {
        let correlation = CorrelationId::from("abc-123");
        let err = ApiError::not_found("Item 999 not found").with_correlation(&correlation);
        assert_eq!(err.correlation_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn response_keeps_status_and_correlation_id() {
        let correlation = CorrelationId::from("abc-123");
        let response = ApiError::validation("Item ID must be non-negative")
            .with_correlation(&correlation)
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn body_omits_missing_correlation_id() {
        let body = ErrorResponse {
            error: "not_found".to_string(),
            message: "gone".to_string(),
            correlation_id: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("correlation_id"));
    }
}
