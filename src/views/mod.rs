//! HTML views for the web interface.
//!
//! Rendering is a pure function of its inputs: the same outcome always
//! produces the same markup.

use crate::models::{ApiResponseError, ClassificationResult, Outcome};

const TITLE: &str = "JSON Text Classifier";

const PLACEHOLDER: &str = r#"E.g., {"title": "Latest AI Breakthrough", "content": "Scientists have achieved a new milestone in AI research..."}"#;

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; background: #f3f4f6; color: #111827; margin: 0; }
    main { max-width: 56rem; margin: 0 auto; padding: 2rem 1rem; }
    h1 { text-align: center; color: #2563eb; font-size: 2.5rem; }
    .intro { text-align: center; color: #374151; }
    .panel { background: #fff; border: 1px solid #e5e7eb; border-radius: 0.75rem; padding: 1.5rem; }
    textarea { width: 100%; min-height: 15rem; padding: 0.75rem; box-sizing: border-box; font-family: monospace; }
    button { width: 100%; margin-top: 1rem; padding: 0.75rem; background: #2563eb; color: #fff; border: 0; border-radius: 0.5rem; font-weight: 600; }
    button:disabled { opacity: 0.5; cursor: not-allowed; }
    .input-error { color: #dc2626; font-size: 0.875rem; }
    .outcome { margin-top: 2rem; padding-top: 2rem; border-top: 1px solid #d1d5db; }
    .error { background: #fee2e2; border: 1px solid #f87171; color: #b91c1c; padding: 0.75rem 1rem; border-radius: 0.25rem; }
    .error-details { font-size: 0.875rem; margin: 0.25rem 0 0; }
    .result h3 { text-align: center; }
    .label { font-weight: 600; color: #2563eb; }
    .reasoning { display: block; margin-top: 0.25rem; padding: 0.5rem; background: #f3f4f6; border-radius: 0.375rem; white-space: pre-wrap; }
    footer { margin-top: 3rem; text-align: center; color: #6b7280; font-size: 0.875rem; }
"#;

/// Everything the page needs to render
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    /// Text to show in the textarea
    pub input: &'a str,
    /// Inline message shown under the textarea
    pub input_error: Option<&'a str>,
    /// Whether a classification is in flight
    pub busy: bool,
    /// Current outcome
    pub outcome: &'a Outcome,
}

/// Escape text for use in HTML content and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Human label for a verdict
pub fn verdict_label(has_quantitative_data: bool) -> &'static str {
    if has_quantitative_data {
        "Yes"
    } else {
        "No"
    }
}

fn render_error(error: &ApiResponseError) -> String {
    let details = error
        .details
        .as_deref()
        .map(|details| format!(r#"<p class="error-details">{}</p>"#, html_escape(details)))
        .unwrap_or_default();

    format!(
        r#"<div class="error" role="alert"><strong>Error!</strong> <span class="error-message">{}</span>{}</div>"#,
        html_escape(&error.message),
        details
    )
}

fn render_result(result: &ClassificationResult) -> String {
    let reasoning = result
        .reasoning
        .as_deref()
        .filter(|reasoning| !reasoning.is_empty())
        .map(|reasoning| {
            format!(
                r#"<p><span class="label">Reasoning:</span> <span class="reasoning">{}</span></p>"#,
                html_escape(reasoning)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="result"><h3>Classification Result</h3><p><span class="label">Contains Quantitative Data:</span> <span class="verdict">{}</span></p>{}</div>"#,
        verdict_label(result.has_quantitative_data),
        reasoning
    )
}

/// Render the outcome region; empty while no outcome is available
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Failure(error) => render_error(error),
        Outcome::Success(result) => render_result(result),
        Outcome::Pending => String::new(),
    }
}

/// Render the full single-page form
pub fn render_page(view: &PageView<'_>) -> String {
    let disabled = if view.busy { " disabled" } else { "" };
    let button_label = if view.busy { "Classifying..." } else { "Classify Text" };

    let input_error = view
        .input_error
        .map(|message| format!(r#"<p class="input-error">{}</p>"#, html_escape(message)))
        .unwrap_or_default();

    let outcome = if view.outcome.is_pending() {
        String::new()
    } else {
        format!(
            r#"<section class="outcome">{}</section>"#,
            render_outcome(view.outcome)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
<main>
    <h1>{title}</h1>
    <p class="intro">Paste your JSON data below to check whether it contains quantitative experimental data, using the Gemini API.</p>
    <div class="panel">
        <form id="classify-form" method="post" action="/">
            <label for="json_input">Enter JSON Data:</label>
            <textarea id="json_input" name="json_input" rows="10" placeholder="{placeholder}"{disabled}>{input}</textarea>
            {input_error}
            <button id="classify-button" type="submit"{disabled}>{button_label}</button>
        </form>
        {outcome}
    </div>
    <footer>Powered by Gemini API &amp; Rust</footer>
</main>
<script>
    document.getElementById("classify-form").addEventListener("submit", function () {{
        var button = document.getElementById("classify-button");
        button.disabled = true;
        button.textContent = "Classifying...";
    }});
</script>
</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        placeholder = html_escape(PLACEHOLDER),
        disabled = disabled,
        input = html_escape(view.input),
        input_error = input_error,
        button_label = button_label,
        outcome = outcome,
    )
}
