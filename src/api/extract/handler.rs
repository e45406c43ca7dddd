// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extract API endpoint handler

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tracing::{debug, info};
use url::Url;

use super::request::ExtractRequest;
use super::response::ExtractResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::extraction::Extraction;

/// POST /extract - Extract main content from supplied HTML
///
/// # Request
/// - `html`: Raw HTML document (required, non-blank)
/// - `url`: Source URL (required, absolute http/https)
///
/// # Response
/// - `title`: Page title ("" when none)
/// - `text`: Main content text
/// - `score`: Heuristic quality score
/// - `success`: Always true
/// - `engine`: `readability` or `selector`
///
/// # Errors
/// - 400 Bad Request: Malformed JSON body
/// - 413 Payload Too Large: Body beyond twice the HTML size limit
/// - 422 Unprocessable Entity: Validation failure or extraction failure
/// - 503 Service Unavailable: No extraction slot free in time
/// - 504 Gateway Timeout: Extraction exceeded the timeout
pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Json(request) = payload?;

    let (html, url) = request
        .validate(state.config.max_html_bytes)
        .map_err(|e| {
            debug!("Extract validation failed: {}", e);
            e
        })?;

    debug!("Extract request: {} bytes from {}", html.len(), url);

    let extraction = run_extraction(&state, html, url).await?;
    let score = state
        .scorer
        .calculate(extraction.title.as_deref(), &extraction.text);
    state.metrics.observe_score(score);

    info!(
        "Extract complete: {} chars, score {:.2}, engine {}",
        extraction.text.chars().count(),
        score,
        extraction.engine
    );

    Ok(Json(ExtractResponse::new(extraction, score)))
}

/// Run the pipeline through the concurrency gate
pub async fn run_extraction(
    state: &AppState,
    html: String,
    url: Url,
) -> Result<Extraction, ApiError> {
    let pipeline = state.pipeline.clone();
    state
        .gate
        .run(move || pipeline.extract(&html, &url))
        .await?
        .map_err(ApiError::from)
}
