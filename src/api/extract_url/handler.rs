// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL extract API endpoint handler

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::{extract::State, Json};
use tracing::{debug, info, warn};

use super::request::ExtractUrlRequest;
use super::response::ExtractUrlResponse;
use crate::api::errors::ApiError;
use crate::api::extract::run_extraction;
use crate::api::http_server::AppState;
use crate::api::rate_limiter::client_key;
use crate::fetch::{normalize_url, validate_url, CachedExtraction};
use crate::monitoring::CacheOperation;

/// POST /extract/url - Fetch a page and extract its main content
///
/// # Request
/// - `url`: Page URL (required, http/https, no internal service ports)
///
/// # Response
/// - `title`, `text`, `engine`, `score`: As for `/extract`
/// - `cached`: Whether the result was served from cache
/// - `url`: Normalised URL
///
/// # Errors
/// - 400 Bad Request: Invalid URL, blocked port or non-HTML content
/// - 403 Forbidden: URL points at a private or local address
/// - 413 Payload Too Large: Page exceeds the size limit
/// - 422 Unprocessable Entity: No content could be extracted
/// - 429 Too Many Requests: Rate limited
/// - 502 Bad Gateway: Upstream error status or connection failure
/// - 503 Service Unavailable: No extraction slot free in time
/// - 504 Gateway Timeout: Fetch or extraction timed out
pub async fn extract_url_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ExtractUrlRequest>, JsonRejection>,
) -> Result<Json<ExtractUrlResponse>, ApiError> {
    let client = client_key(&headers);
    if let Err(e) = state.rate_limiter.check(&client) {
        warn!("Rate limit exceeded for client {}", client);
        state.metrics.record_rate_limited();
        return Err(e);
    }

    let Json(request) = payload?;
    let raw_url = request.validate()?;
    let url = validate_url(raw_url, &state.config.fetch.blocked_ports)?;

    let normalized = normalize_url(url);
    for transformation in &normalized.transformations {
        state
            .metrics
            .record_url_transformation(transformation.as_str());
    }
    let url = normalized.url;
    let cache_key = url.to_string();

    // A lookup may drop an expired entry
    let cached = state.cache.get(&cache_key);
    state.metrics.set_cache_size(state.cache.len());

    if let Some(entry) = cached {
        debug!("Extraction cache hit for: {}", cache_key);
        state.metrics.record_cache_operation(CacheOperation::Hit);
        return Ok(Json(ExtractUrlResponse::from_cached(entry, cache_key, true)));
    }
    state.metrics.record_cache_operation(CacheOperation::Miss);

    state.ssrf_guard.check(&url).await.map_err(|e| {
        warn!("SSRF guard rejected {}: {}", url, e);
        e
    })?;

    let page = state.fetcher.fetch(&url).await?;
    let extraction = run_extraction(&state, page.html, page.final_url).await?;
    let score = state
        .scorer
        .calculate(extraction.title.as_deref(), &extraction.text);
    state.metrics.observe_score(score);

    let entry = CachedExtraction {
        title: extraction.title.unwrap_or_default(),
        text: extraction.text,
        engine: extraction.engine,
        score,
    };
    state.cache.insert(&cache_key, entry.clone());
    state.metrics.record_cache_operation(CacheOperation::Set);
    state.metrics.set_cache_size(state.cache.len());

    info!(
        "URL extract complete: {} ({} chars, score {:.2})",
        cache_key,
        entry.text.chars().count(),
        score
    );

    Ok(Json(ExtractUrlResponse::from_cached(entry, cache_key, false)))
}
