//! Data models module
//!
//! Defines the classification outcome types shared by the service layer,
//! the HTTP handlers and the HTML views

use serde::{Deserialize, Serialize};

pub mod gemini;

/// Verdict returned by the model for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether the document contains quantitative experimental data
    pub has_quantitative_data: bool,
    /// Short natural-language justification (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Where a failure originated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureKind {
    /// The upstream call or its reply failed
    #[default]
    Upstream,
    /// This server is missing required configuration
    Configuration,
}

/// Normalized error shape shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponseError {
    /// Error message
    pub message: String,
    /// Details (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Not part of the displayed shape
    #[serde(skip)]
    pub kind: FailureKind,
}

impl ApiResponseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            kind: FailureKind::Upstream,
        }
    }

    /// Failure caused by missing local configuration
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Configuration,
            ..Self::new(message)
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == FailureKind::Configuration
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Outcome of the most recent classification attempt
///
/// `Pending` covers both "nothing submitted yet" and "request in flight":
/// a new submission clears the previous outcome before the call is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Success(ClassificationResult),
    Failure(ApiResponseError),
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

impl From<Result<ClassificationResult, ApiResponseError>> for Outcome {
    fn from(result: Result<ClassificationResult, ApiResponseError>) -> Self {
        match result {
            Ok(classification) => Outcome::Success(classification),
            Err(error) => Outcome::Failure(error),
        }
    }
}
