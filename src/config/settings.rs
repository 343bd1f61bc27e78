//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini API configuration
    pub gemini: GeminiConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; checked per request, not at startup
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Request timeout in seconds (transport default when unset)
    pub timeout: Option<u64>,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request size in bytes
    pub max_request_size: usize,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let timeout = match lookup("GEMINI_TIMEOUT") {
            Some(value) => Some(value.parse().context("Invalid Gemini timeout value")?),
            None => None,
        };

        let settings = Self {
            server: ServerConfig {
                host: get_or_default("SERVER_HOST", "127.0.0.1"),
                port: get_or_default("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
            },
            gemini: GeminiConfig {
                api_key,
                base_url: get_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
                model: get_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                timeout,
            },
            request: RequestConfig {
                max_request_size: get_or_default("MAX_REQUEST_SIZE", "1048576")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            security: SecurityConfig {
                cors_enabled: get_or_default("CORS_ENABLED", "false")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
            },
            logging: LoggingConfig {
                level: get_or_default("RUST_LOG", "info"),
                format: get_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if let Some(api_key) = &self.gemini.api_key {
            if api_key.contains(char::is_whitespace) {
                anyhow::bail!("Gemini API key cannot contain whitespace characters");
            }
        }

        if !self.gemini.base_url.starts_with("http") {
            anyhow::bail!("Invalid Gemini base URL format, should start with 'http'");
        }

        if self.gemini.model.trim().is_empty() {
            anyhow::bail!("Gemini model cannot be empty");
        }

        if self.gemini.timeout == Some(0) {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Listen address as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether a Gemini API key is configured
    pub fn has_credential(&self) -> bool {
        self.gemini.api_key.is_some()
    }
}
