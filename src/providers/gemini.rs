//! Gemini Provider implementation
//!
//! Sends one structured-output `generateContent` request per classification
//! and normalizes every reply into a verdict or a `ClassifyError`

use super::{Classifier, ClassifyError};
use crate::config::GeminiConfig;
use crate::models::gemini::{GeminiErrorResponse, GenerateContentResponse};
use crate::models::ClassificationResult;
use crate::services::contract::{self, ResponseFormatError};
use crate::utils::logging::create_request_log_summary;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MISSING_KEY_MESSAGE: &str = "GEMINI_API_KEY is not set. Please ensure it's configured.";

/// Gemini classifier
pub struct GeminiClassifier {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClassifier {
    /// Create a new classifier from explicit configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Build the request URL
    fn build_url(&self) -> String {
        let base_url = self.config.base_url.trim_end_matches('/');
        format!("{}/models/{}:generateContent", base_url, self.config.model)
    }

    fn api_key(&self) -> Result<&str, ClassifyError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClassifyError::Configuration(MISSING_KEY_MESSAGE.to_string()))
    }

    /// Map a non-2xx reply to a transport error with status and nested message
    fn status_error(status: StatusCode, body: &str) -> ClassifyError {
        let message = format!(
            "API Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        );
        let details = serde_json::from_str::<GeminiErrorResponse>(body)
            .ok()
            .and_then(|response| response.error.message)
            .filter(|message| !message.is_empty());

        ClassifyError::Transport { message, details }
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn classify(&self, json_text: &str) -> Result<ClassificationResult, ClassifyError> {
        let api_key = self.api_key()?;

        let request = contract::build_request(json_text);
        if let Ok(summary_json) = serde_json::to_string_pretty(&create_request_log_summary(&request)) {
            debug!("📤 Gemini Request ({}):\n{}", self.config.model, summary_json);
        }

        let response = self
            .client
            .post(self.build_url())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed to send: {}", e);
                ClassifyError::transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Gemini response body: {}", e);
            ClassifyError::transport(e.to_string())
        })?;

        if !status.is_success() {
            error!("Gemini API request failed: {} - {}", status, body);
            return Err(Self::status_error(status, &body));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to decode Gemini response. Raw response:\n{}", body);
            ResponseFormatError::Envelope(e.to_string())
        })?;

        let text = envelope.text();
        if text.trim().is_empty() {
            let block_reason = envelope.block_reason().map(str::to_string);
            warn!("Gemini returned no text (block reason: {:?})", block_reason);
            return Err(ResponseFormatError::Empty { block_reason }.into());
        }

        debug!("📥 Gemini Response Text: {}", text);

        contract::parse_classification(&text).map_err(|e| {
            error!("Gemini response violated the output contract: {}", e);
            ClassifyError::from(e)
        })
    }
}
