//! Provider module
//!
//! Defines the Classifier trait and its upstream implementations

pub mod gemini;

use crate::models::{ApiResponseError, ClassificationResult, FailureKind};
use crate::services::contract::ResponseFormatError;
use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClassifier;

/// Fallback message when a failure carries no usable text
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred during classification.";

/// Classification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Missing credential; raised before any network activity
    #[error("{0}")]
    Configuration(String),

    /// Reply did not honour the output contract
    #[error(transparent)]
    ResponseFormat(#[from] ResponseFormatError),

    /// Network or service-level failure
    #[error("{message}")]
    Transport {
        message: String,
        details: Option<String>,
    },
}

impl ClassifyError {
    /// Transport error from an arbitrary message, falling back to the generic text
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        ClassifyError::Transport {
            message,
            details: None,
        }
    }

    /// Short kind tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::Configuration(_) => "configuration_error",
            ClassifyError::ResponseFormat(_) => "response_format_error",
            ClassifyError::Transport { .. } => "transport_error",
        }
    }
}

impl From<&ClassifyError> for ApiResponseError {
    fn from(error: &ClassifyError) -> Self {
        match error {
            ClassifyError::Configuration(message) => ApiResponseError::configuration(message.clone()),
            ClassifyError::Transport { message, details } => ApiResponseError {
                message: message.clone(),
                details: details.clone(),
                kind: FailureKind::Upstream,
            },
            ClassifyError::ResponseFormat(ResponseFormatError::Empty {
                block_reason: Some(reason),
            }) => ApiResponseError::new(error.to_string())
                .with_details(format!("Prompt blocked: {}", reason)),
            _ => ApiResponseError::new(error.to_string()),
        }
    }
}

impl From<ClassifyError> for ApiResponseError {
    fn from(error: ClassifyError) -> Self {
        ApiResponseError::from(&error)
    }
}

/// Upstream classification service
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Get the classifier name
    fn name(&self) -> &str;

    /// Whether an access credential is configured
    fn is_configured(&self) -> bool;

    /// Classify a syntactically valid JSON document given as raw text
    async fn classify(&self, json_text: &str) -> Result<ClassificationResult, ClassifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_fallback_message() {
        let err = ClassifyError::transport("");
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);

        let err = ClassifyError::transport("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_conversion_to_api_response_error() {
        let err = ClassifyError::Transport {
            message: "API Error 403: Forbidden".to_string(),
            details: Some("Permission denied".to_string()),
        };
        let api: ApiResponseError = (&err).into();
        assert_eq!(api.message, "API Error 403: Forbidden");
        assert_eq!(api.details.as_deref(), Some("Permission denied"));

        let err = ClassifyError::from(ResponseFormatError::NotJson {
            raw: "oops".to_string(),
        });
        let api = ApiResponseError::from(err);
        assert_eq!(api.message, "Invalid JSON response from API: oops");
        assert!(api.details.is_none());

        let err = ClassifyError::from(ResponseFormatError::Empty {
            block_reason: Some("SAFETY".to_string()),
        });
        let api = ApiResponseError::from(&err);
        assert_eq!(api.message, "Gemini API returned an empty response.");
        assert_eq!(api.details.as_deref(), Some("Prompt blocked: SAFETY"));
        assert!(!api.is_configuration());
    }

    #[test]
    fn test_missing_credential_keeps_configuration_kind() {
        let err = ClassifyError::Configuration("GEMINI_API_KEY is not set.".to_string());
        let api = ApiResponseError::from(&err);
        assert_eq!(api.message, "GEMINI_API_KEY is not set.");
        assert!(api.details.is_none());
        assert!(api.is_configuration());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ClassifyError::Configuration("x".to_string()).kind(),
            "configuration_error"
        );
        assert_eq!(
            ClassifyError::from(ResponseFormatError::MissingVerdict).kind(),
            "response_format_error"
        );
        assert_eq!(ClassifyError::transport("x").kind(), "transport_error");
    }
}
