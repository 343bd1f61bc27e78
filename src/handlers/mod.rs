//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod classify;
pub mod health;

use crate::config::Settings;
use crate::middleware::logging::request_logging_middleware;
use crate::providers::Classifier;
use crate::services::ClassificationSession;
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub session: Arc<ClassificationSession>,
}

/// Create application router
pub async fn create_router(settings: Settings, classifier: Arc<dyn Classifier>) -> Result<Router> {
    info!("Using classifier: {}", classifier.name());

    let session = Arc::new(ClassificationSession::new(classifier));

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        session,
    });

    let cors = if settings.security.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(DefaultBodyLimit::max(settings.request.max_request_size))
        .layer(cors);

    // Create routes
    let router = Router::new()
        .route("/", get(classify::index).post(classify::submit_form))
        .route("/api/classify", post(classify::classify_json))
        .route("/api/outcome", get(classify::current_outcome))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .with_state(app_state)
        .layer(middleware_stack);

    Ok(router)
}
