//! Classification handlers
//!
//! The single-page form (server-rendered) and the equivalent JSON API

use crate::handlers::AppState;
use crate::models::{ClassificationResult, Outcome};
use crate::services::{SubmitError, ValidationError};
use crate::utils::error::{AppError, AppResult};
use crate::views::{render_page, PageView};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Form body posted by the page
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub json_input: String,
}

/// Session snapshot returned by `GET /api/outcome`
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub busy: bool,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Render the form with the current session state
///
/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let outcome = state.session.outcome();
    Html(render_page(&PageView {
        input: "",
        input_error: None,
        busy: state.session.is_busy(),
        outcome: &outcome,
    }))
}

/// Submit the form and render the resulting page
///
/// POST /
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubmitForm>,
) -> Response {
    debug!("Form submission received ({} bytes)", form.json_input.len());

    let (status, input_error) = match state.session.submit(&form.json_input).await {
        Ok(_) => (StatusCode::OK, None),
        Err(SubmitError::Validation(e)) => (StatusCode::BAD_REQUEST, Some(e.to_string())),
        Err(SubmitError::Busy) => (StatusCode::CONFLICT, Some(AppError::Busy.to_string())),
    };

    let outcome = state.session.outcome();
    let page = render_page(&PageView {
        input: &form.json_input,
        input_error: input_error.as_deref(),
        busy: state.session.is_busy(),
        outcome: &outcome,
    });

    (status, Html(page)).into_response()
}

/// Classify a raw JSON body
///
/// POST /api/classify
pub async fn classify_json(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<ClassificationResult>> {
    let body = body?;
    let text = std::str::from_utf8(&body).map_err(|e| ValidationError::InvalidJson {
        reason: e.to_string(),
    })?;

    match state.session.submit(text).await? {
        Outcome::Success(result) => Ok(Json(result)),
        Outcome::Failure(error) => Err(AppError::from(error)),
        Outcome::Pending => Err(AppError::Internal(
            "classification finished without an outcome".to_string(),
        )),
    }
}

/// Current session state
///
/// GET /api/outcome
pub async fn current_outcome(State(state): State<Arc<AppState>>) -> Json<OutcomeResponse> {
    Json(OutcomeResponse {
        busy: state.session.is_busy(),
        outcome: state.session.outcome(),
    })
}
