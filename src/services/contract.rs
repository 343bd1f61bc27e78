//! Classification contract
//!
//! The fixed system instruction, the user message template, the structured
//! output schema, and validation of the model's reply against that schema

use crate::models::gemini::{
    GeminiContent, GenerateContentRequest, GenerationConfig, PropertySchema, ResponseSchema,
    SchemaType, VerdictProperties,
};
use crate::models::ClassificationResult;
use serde_json::Value;
use thiserror::Error;

/// System instruction sent with every classification request
pub const SYSTEM_INSTRUCTION: &str = "You are an expert Scientific Data Curator specialized in Biochemistry and Enzymology.
Your task is to analyze content segments (text paragraphs or figure captions) from scientific papers and classify whether they contain QUANTITATIVE EXPERIMENTAL DATA.

Target Data Definition (Look for these):
- Kinetic parameters: Kcat, Km, Vmax, specific activity (U/mg), turnover rates.
- Physicochemical properties: Melting temperature (Tm), Glass transition (Tg), Crystallinity (%).
- Experimental Conditions paired with Results: pH values, Temperatures (°C), Buffer concentrations linked to activity/stability.
- Quantitative Results: \"30% increase\", \"fold change\", \"degradation rate\", \"yield of 50%\", \"concentration of 100 nM\".
- Statistical markers linked to data: p-values, error margins (± SD/SEM), n=3.

Exclusions (Classify as FALSE):
- General introductory text or broad claims without numbers (\"Enzymes are efficient\").
- Methodology descriptions without results (\"We used HPLC to measure...\").
- Citations or references descriptions.
- Acknowledgments or author affiliations.

Respond with a single JSON object matching the response schema.
Prioritize RECALL: If you are unsure but it looks like a result, classify as TRUE.";

const USER_MESSAGE_PREAMBLE: &str = "Analyze the following JSON content for quantitative experimental data. \
Focus your analysis on the 'text_content' field, and within 'text_segments' and 'artifacts' if present, \
to determine if the document contains such data. Provide a brief reasoning for your classification:";

pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Response validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormatError {
    #[error("Gemini API returned an empty response.")]
    Empty {
        /// Why the prompt was blocked, when the API says so
        block_reason: Option<String>,
    },

    #[error("Invalid JSON response from API: {raw}")]
    NotJson { raw: String },

    #[error("Missing or invalid 'has_quantitative_data' in API response.")]
    MissingVerdict,

    #[error("Failed to decode Gemini response: {0}")]
    Envelope(String),
}

/// User message embedding the caller's JSON text verbatim
pub fn user_message(json_text: &str) -> String {
    format!("{}\n\n{}", USER_MESSAGE_PREAMBLE, json_text)
}

/// Structured output contract: required boolean, optional string, fixed order
pub fn response_schema() -> ResponseSchema {
    ResponseSchema {
        schema_type: SchemaType::Object,
        properties: VerdictProperties {
            has_quantitative_data: PropertySchema {
                schema_type: SchemaType::Boolean,
                description: "True if the content contains quantitative experimental data, false otherwise."
                    .to_string(),
            },
            reasoning: PropertySchema {
                schema_type: SchemaType::String,
                description: "A brief explanation for the classification (why it is true or false)."
                    .to_string(),
            },
        },
        required: vec!["has_quantitative_data".to_string()],
        property_ordering: vec![
            "has_quantitative_data".to_string(),
            "reasoning".to_string(),
        ],
    }
}

/// Build the full generateContent request for one document
pub fn build_request(json_text: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![GeminiContent::text(Some("user"), user_message(json_text))],
        system_instruction: Some(GeminiContent::text(None, SYSTEM_INSTRUCTION)),
        generation_config: Some(GenerationConfig {
            response_mime_type: RESPONSE_MIME_TYPE.to_string(),
            response_schema: response_schema(),
        }),
    }
}

/// Validate the model's textual reply against the output contract
pub fn parse_classification(text: &str) -> Result<ClassificationResult, ResponseFormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ResponseFormatError::Empty { block_reason: None });
    }

    let value: Value = serde_json::from_str(text).map_err(|_| ResponseFormatError::NotJson {
        raw: text.to_string(),
    })?;

    let has_quantitative_data = value
        .get("has_quantitative_data")
        .and_then(Value::as_bool)
        .ok_or(ResponseFormatError::MissingVerdict)?;

    let reasoning = match value.get("reasoning") {
        None | Some(Value::Null) => None,
        Some(Value::String(reasoning)) => Some(reasoning.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(ClassificationResult {
        has_quantitative_data,
        reasoning,
    })
}
