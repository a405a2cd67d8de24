//! JSON error responses.
//!
//! Every failure is rendered as `{"error": CODE, "message": text}` with an
//! optional `details` object.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use stockflow_db::InventoryError;
use stockflow_shared::{AppError, ErrorKind};
use tracing::error;
use validator::ValidationErrors;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    /// Creates an error without details.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches a `details` object.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Missing or malformed caller identity.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code of this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({
                "error": self.code,
                "message": self.message,
                "details": details,
            }),
            None => json!({
                "error": self.code,
                "message": self.message,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if matches!(err.kind(), ErrorKind::Internal | ErrorKind::Consistency) {
            error!(error = %err, code = err.error_code(), "Inventory operation failed");
            return Self::new(status, err.error_code(), "An internal error occurred");
        }

        let mut api = Self::new(status, err.error_code(), err.to_string());
        if let Some(field) = err.field() {
            api = api.with_details(json!({ "field": field }));
        } else if err.is_retryable() {
            api = api.with_details(json!({ "retryable": true }));
        }
        api
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if err.is_client_error() {
            Self::new(status, err.error_code(), err.to_string())
        } else {
            error!(error = %err, "Request failed");
            Self::new(status, err.error_code(), "An internal error occurred")
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "INVALID_BODY", rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let details = serde_json::to_value(&err).unwrap_or(Value::Null);
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            "Request validation failed",
        )
        .with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockflow_core::document::{DocumentError, DocumentStatus};
    use stockflow_db::SequenceError;

    #[test]
    fn test_validation_error_carries_field() {
        let api = ApiError::from(InventoryError::from(DocumentError::ZeroQuantity { line: 1 }));
        assert_eq!(api.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.code(), "ZERO_QUANTITY");
        assert_eq!(api.details, Some(json!({ "field": "lines[0].quantity" })));
    }

    #[test]
    fn test_state_error_is_conflict() {
        let api = ApiError::from(InventoryError::from(DocumentError::InvalidState {
            action: "validate",
            current: DocumentStatus::Cancelled,
        }));
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.message, "Cannot validate a document in cancelled status");
    }

    #[test]
    fn test_concurrent_modification_is_retryable() {
        let api = ApiError::from(InventoryError::from(SequenceError::ConcurrentModification {
            domain: "sale".to_string(),
            code_type: "invoice".to_string(),
        }));
        assert_eq!(api.status(), StatusCode::CONFLICT);
        assert_eq!(api.details, Some(json!({ "retryable": true })));
    }

    #[test]
    fn test_database_error_message_is_hidden() {
        let api = ApiError::from(InventoryError::Database(sea_orm::DbErr::Custom(
            "connection reset".to_string(),
        )));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "An internal error occurred");
    }

    #[test]
    fn test_app_error_conversion() {
        let api = ApiError::from(AppError::NotFound("warehouse 4".to_string()));
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.code(), "NOT_FOUND");

        let api = ApiError::from(AppError::Database("pool timed out".to_string()));
        assert_eq!(api.message, "An internal error occurred");
    }
}
