//! Error handling module
//!
//! HTTP-facing error type for the JSON API

use crate::models::ApiResponseError;
use crate::services::session::SubmitError;
use crate::services::validator::ValidationError;
use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Server-side configuration is missing or invalid
    #[error("{}", .0.message)]
    Config(ApiResponseError),

    /// Request validation failed
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be read
    #[error("{message}")]
    Body { status: StatusCode, message: String },

    /// A classification is already in flight
    #[error("A classification is already in progress. Please wait for it to finish.")]
    Busy,

    /// Upstream classification failed
    #[error("{}", .0.message)]
    Classification(ApiResponseError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Body { status, .. } => *status,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::Classification(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::Body { .. } => "invalid_request_error",
            AppError::Busy => "conflict_error",
            AppError::Classification(_) => "classification_error",
            AppError::Config(_) => "configuration_error",
            AppError::Internal(_) => "api_error",
        }
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(
            self,
            AppError::Validation(_) | AppError::Body { .. } | AppError::Busy
        )
    }

    /// Convert to the `{message, details?}` body shared with the HTML view
    pub fn to_api_error(&self) -> ApiResponseError {
        match self {
            AppError::Classification(error) | AppError::Config(error) => error.clone(),
            other => ApiResponseError::new(other.to_string()),
        }
    }
}

impl From<ApiResponseError> for AppError {
    fn from(error: ApiResponseError) -> Self {
        if error.is_configuration() {
            AppError::Config(error)
        } else {
            AppError::Classification(error)
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(error: SubmitError) -> Self {
        match error {
            SubmitError::Validation(e) => AppError::Validation(e),
            SubmitError::Busy => AppError::Busy,
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_details() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self.error_type(), status);
        }

        (status, Json(self.to_api_error())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(ValidationError::Empty).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Busy.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Classification(ApiResponseError::new("x")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(AppError::Internal("test".to_string()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_failure_kind_selects_variant() {
        let error = AppError::from(ApiResponseError::configuration("GEMINI_API_KEY is not set."));
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_type(), "configuration_error");
        assert_eq!(error.to_api_error().message, "GEMINI_API_KEY is not set.");

        let error = AppError::from(ApiResponseError::new("API Error 500: Internal Server Error"));
        assert!(matches!(error, AppError::Classification(_)));
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_body_error_keeps_status() {
        let error = AppError::Body {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.to_api_error(), ApiResponseError::new("length limit exceeded"));
        assert!(!error.should_log_details());
    }

    #[test]
    fn test_classification_error_body_is_passed_through() {
        let error = ApiResponseError::new("API Error 401: Unauthorized").with_details("bad key");
        let app_error = AppError::Classification(error.clone());
        assert_eq!(app_error.to_string(), "API Error 401: Unauthorized");
        assert_eq!(app_error.to_api_error(), error);
    }

    #[test]
    fn test_validation_message() {
        let app_error = AppError::from(SubmitError::Validation(ValidationError::Empty));
        assert_eq!(app_error.to_api_error().message, "JSON input cannot be empty.");
        assert!(!app_error.should_log_details());
    }
}
