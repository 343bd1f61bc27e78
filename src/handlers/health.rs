//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const SERVICE_NAME: &str = "quant-classifier";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Classifier backend name
    pub classifier: String,
    /// Model the classifier calls
    pub model: String,
    /// Credential status
    pub credential: String,
    /// Whether a classification is in flight
    pub busy: bool,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

fn build_response(state: &AppState, status: &str) -> HealthResponse {
    let credential = if state.session.is_configured() {
        "configured"
    } else {
        "missing"
    };

    HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            classifier: state.session.classifier_name().to_string(),
            model: state.settings.gemini.model.clone(),
            credential: credential.to_string(),
            busy: state.session.is_busy(),
            uptime_seconds: get_uptime_seconds(),
        }),
    }
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");
    Json(build_response(&state, "healthy"))
}

/// Readiness check
///
/// GET /health/ready
/// Not ready while no API credential is configured
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    debug!("Executing readiness check");

    if !state.session.is_configured() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(build_response(&state, "ready")))
}

/// Liveness check
///
/// GET /health/live
pub async fn liveness_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing liveness check");
    Json(build_response(&state, "alive"))
}

/// Get service uptime in seconds
fn get_uptime_seconds() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START_TIME: OnceLock<Instant> = OnceLock::new();

    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}
