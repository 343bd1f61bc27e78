//! Quantitative Data Classifier Library
//!
//! Classifies scientific JSON documents for quantitative experimental data
//! through the Gemini API and serves the single-page form around it

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;
pub mod views;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, AppState};
pub use models::{ApiResponseError, ClassificationResult, FailureKind, Outcome};
pub use providers::{Classifier, ClassifyError, GeminiClassifier};
pub use services::{ClassificationSession, SubmitError, ValidationError};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
