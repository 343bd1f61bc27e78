//! Logging utilities
//!
//! Subscriber setup and request summaries for debug logs

use crate::config::LoggingConfig;
use crate::models::gemini::{GeminiContent, GenerateContentRequest};
use anyhow::Result;

/// Initialize logging system
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs (production environment)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        // Human readable format (development environment)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars truncated)", kept, s.chars().count() - max_len)
    } else {
        s.to_string()
    }
}

fn content_preview(content: &GeminiContent, max_len: usize) -> serde_json::Value {
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    serde_json::json!({
        "role": content.role,
        "text": truncate_content(&text, max_len),
    })
}

/// Create a filtered summary of a generateContent request for logging
/// Keeps original structure but truncates verbose content
pub fn create_request_log_summary(request: &GenerateContentRequest) -> serde_json::Value {
    let contents: Vec<serde_json::Value> = request
        .contents
        .iter()
        .map(|content| content_preview(content, 200))
        .collect();

    let system = match &request.system_instruction {
        Some(instruction) => content_preview(instruction, 100),
        None => serde_json::Value::Null,
    };

    let response_mime_type = request
        .generation_config
        .as_ref()
        .map(|config| config.response_mime_type.clone());

    serde_json::json!({
        "contents": contents,
        "system_instruction": system,
        "response_mime_type": response_mime_type,
        "response_schema": "[omitted]",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::contract::build_request;

    #[test]
    fn test_truncate_content() {
        assert_eq!(truncate_content("short", 10), "short");
        assert_eq!(truncate_content("abcdefghij", 4), "abcd... (6 chars truncated)");
        // Multi-byte characters are never split
        assert_eq!(truncate_content("μμμμ", 2), "μμ... (2 chars truncated)");
    }

    #[test]
    fn test_request_summary_truncates_document() {
        let document = format!("{{\"text_content\": \"{}\"}}", "x".repeat(1000));
        let summary = create_request_log_summary(&build_request(&document));

        let text = summary["contents"][0]["text"].as_str().unwrap();
        assert!(text.contains("chars truncated"));
        assert!(text.len() < document.len());
        assert_eq!(summary["response_mime_type"], "application/json");
        assert_eq!(summary["response_schema"], "[omitted]");
    }
}
