// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::{sync::Arc, time::Duration, time::Instant};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use super::errors::ApiError;
use super::extract::extract_handler;
use super::extract_url::extract_url_handler;
use super::gate::ExtractionGate;
use super::rate_limiter::ClientRateLimiter;
use crate::config::ServiceConfig;
use crate::extraction::{ExtractionPipeline, ScoreCalculator};
use crate::fetch::{ExtractionCache, HtmlSource, HttpFetcher, SsrfGuard};
use crate::monitoring::{HealthReport, ServiceMetrics};

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state for all handlers
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub pipeline: Arc<ExtractionPipeline>,
    pub scorer: ScoreCalculator,
    pub gate: ExtractionGate,
    pub metrics: Arc<ServiceMetrics>,
    pub cache: Arc<ExtractionCache>,
    pub fetcher: Arc<dyn HtmlSource>,
    pub ssrf_guard: SsrfGuard,
    pub rate_limiter: Arc<ClientRateLimiter>,
}

impl AppState {
    /// Production state: readability pipeline and reqwest fetcher
    pub fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let metrics = Arc::new(ServiceMetrics::new()?);
        let pipeline = ExtractionPipeline::from_config(&config);
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
        Ok(Self::with_components(config, pipeline, fetcher, metrics))
    }

    /// Assemble state from explicit components
    ///
    /// The pipeline is wired to `metrics` here, so callers pass it bare.
    pub fn with_components(
        config: ServiceConfig,
        pipeline: ExtractionPipeline,
        fetcher: Arc<dyn HtmlSource>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        let gate = ExtractionGate::new(
            config.max_concurrency,
            config.queue_timeout(),
            config.extraction_timeout(),
            metrics.clone(),
        );

        Self {
            pipeline: Arc::new(pipeline.with_metrics(metrics.clone())),
            scorer: ScoreCalculator::new(config.score_log_scale),
            gate,
            cache: Arc::new(ExtractionCache::new(
                config.cache_ttl_secs,
                config.cache_max_entries,
            )),
            ssrf_guard: SsrfGuard::new(config.fetch.allow_dns_failure),
            rate_limiter: Arc::new(ClientRateLimiter::new(config.rate_limit_per_minute)),
            fetcher,
            metrics,
            config: Arc::new(config),
        }
    }

    /// Default configuration with the real engines
    pub fn new_for_test() -> anyhow::Result<Self> {
        Self::new(ServiceConfig::default())
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    // JSON escaping can double the size of an HTML document
    let body_limit = state.config.max_html_bytes.saturating_mul(2);

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/extract/url", post(extract_url_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            track_http_metrics,
        ))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl+C / SIGTERM
pub async fn start_server(config: ServiceConfig) -> anyhow::Result<()> {
    let addr = config
        .listen_addr()
        .map_err(|e| anyhow::anyhow!(e))?;
    let state = Arc::new(AppState::new(config)?);

    let cache = state.cache.stats();
    info!(
        "Extraction cache: up to {} entries, ttl {}s",
        cache.max_size, cache.ttl_secs
    );

    spawn_rate_limit_cleanup(state.rate_limiter.clone());

    let app = create_app(state);
    let listener = TcpListener::bind(addr).await?;

    info!("Readability service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn spawn_rate_limit_cleanup(limiter: Arc<ClientRateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let pipeline = state.pipeline.clone();
    let available = tokio::task::spawn_blocking(move || pipeline.is_available())
        .await
        .unwrap_or(false);

    Json(HealthReport::new(available))
}

/// GET /metrics
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::InternalError(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.metrics.content_type())],
        body,
    )
        .into_response())
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn track_http_metrics(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    state.metrics.record_http_request(
        &method,
        &endpoint,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}
