//! Input validation
//!
//! Rejects empty or syntactically invalid JSON before anything is sent upstream

use serde_json::Value;
use thiserror::Error;

/// Top-level fields the classification prompt tells the model to focus on
pub const RECOGNISED_FIELDS: [&str; 3] = ["text_content", "text_segments", "artifacts"];

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("JSON input cannot be empty.")]
    Empty,

    #[error("Invalid JSON format. Please enter valid JSON.")]
    InvalidJson {
        /// Parser diagnostic (line/column)
        reason: String,
    },
}

/// Input that parsed as JSON, still carrying the caller's raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput<'a> {
    raw: &'a str,
    recognised_fields: Vec<&'static str>,
}

impl<'a> ValidatedInput<'a> {
    /// Raw text exactly as submitted
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Recognised document fields present at the top level
    pub fn recognised_fields(&self) -> &[&'static str] {
        &self.recognised_fields
    }

    /// Whether the document has any of the fields the prompt refers to
    pub fn has_expected_shape(&self) -> bool {
        !self.recognised_fields.is_empty()
    }
}

/// Validate raw text as a JSON document
///
/// Any JSON value is accepted; a document without the recognised fields is
/// still forwarded, the caller only gets a hint through `has_expected_shape`.
pub fn validate_json_input(raw: &str) -> Result<ValidatedInput<'_>, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    let value: Value = serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson {
        reason: e.to_string(),
    })?;

    let recognised_fields = match &value {
        Value::Object(map) => RECOGNISED_FIELDS
            .iter()
            .copied()
            .filter(|field| map.contains_key(*field))
            .collect(),
        _ => Vec::new(),
    };

    Ok(ValidatedInput {
        raw,
        recognised_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert_eq!(validate_json_input(""), Err(ValidationError::Empty));
        assert_eq!(validate_json_input("   \n\t  "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_invalid_json_rejected() {
        for input in [r#"{"a":}"#, "{", "not json", r#"{"a": 1,}"#] {
            let err = validate_json_input(input).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidJson { .. }), "input: {}", input);
            assert_eq!(err.to_string(), "Invalid JSON format. Please enter valid JSON.");
        }
    }

    #[test]
    fn test_valid_input_keeps_raw_text() {
        let raw = "  {\"text_content\": \"Km = 5 μM\"}\n";
        let validated = validate_json_input(raw).unwrap();
        assert_eq!(validated.raw(), raw);
        assert_eq!(validated.recognised_fields(), &["text_content"]);
        assert!(validated.has_expected_shape());
    }

    #[test]
    fn test_unexpected_shapes_are_accepted() {
        let validated = validate_json_input(r#"{"title": "Latest AI Breakthrough"}"#).unwrap();
        assert!(!validated.has_expected_shape());

        let validated = validate_json_input("[1, 2, 3]").unwrap();
        assert!(validated.recognised_fields().is_empty());

        assert!(validate_json_input("42").is_ok());
    }

    #[test]
    fn test_all_recognised_fields_reported_in_order() {
        let raw = r#"{"artifacts": [], "text_segments": [], "text_content": ""}"#;
        let validated = validate_json_input(raw).unwrap();
        assert_eq!(
            validated.recognised_fields(),
            &["text_content", "text_segments", "artifacts"]
        );
    }
}
