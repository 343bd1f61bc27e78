//! Quantitative Data Classifier Server
//!
//! Serves the JSON classification form and API on top of the Gemini API

use anyhow::{Context, Result};
use quant_classifier::utils::logging::init_logging;
use quant_classifier::{create_router, version_info, GeminiClassifier, Settings};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging)?;
    info!("{}", version_info());

    if !settings.has_credential() {
        warn!("GEMINI_API_KEY is not set; classification requests will fail until it is configured");
    }

    let classifier = GeminiClassifier::new(settings.gemini.clone())
        .context("Failed to create Gemini classifier")?;
    info!("Gemini model: {}", settings.gemini.model);

    let app = create_router(settings.clone(), Arc::new(classifier)).await?;

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Classifier server started!");
    info!("📝 Form: http://{}/", addr);
    info!("🔄 API endpoint: http://{}/api/classify", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
