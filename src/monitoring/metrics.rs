// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prometheus metrics for the extraction service
//!
//! Each [`ServiceMetrics`] owns its own registry, so two app instances (for
//! example in tests) never share counters.

use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::time::Duration;

const EXTRACTION_DURATION_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];
const FALLBACK_DURATION_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0];
const HTTP_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0];

/// Score buckets: 0..100 in steps of 10, then 200, 500, 1000
fn score_buckets() -> Vec<f64> {
    let mut buckets: Vec<f64> = (0..=10).map(|i| f64::from(i) * 10.0).collect();
    buckets.extend_from_slice(&[200.0, 500.0, 1000.0]);
    buckets
}

/// Cache operation label values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOperation {
    Hit,
    Miss,
    Set,
}

impl CacheOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Hit => "hit",
            CacheOperation::Miss => "miss",
            CacheOperation::Set => "set",
        }
    }
}

/// All metrics exported on `/metrics`
///
/// - `extractor_extraction_attempts_total{success}`
/// - `extractor_extraction_duration_seconds`
/// - `extractor_extraction_score`
/// - `extractor_fallback_requests_total`
/// - `extractor_readability_fallback_duration_seconds`
/// - `extractor_http_requests_total{method,endpoint,status_code}`
/// - `extractor_http_request_duration_seconds{method,endpoint}`
/// - `extractor_in_flight_extractions`
/// - `extractor_cache_operations_total{operation}`
/// - `extractor_cache_size`
/// - `extractor_url_transformations_total{type}`
/// - `extractor_rate_limited_total`
#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,
    pub extraction_attempts: IntCounterVec,
    pub extraction_duration: Histogram,
    pub extraction_score: Histogram,
    pub fallback_requests: IntCounter,
    pub fallback_duration: Histogram,
    pub http_requests: IntCounterVec,
    pub http_request_duration: HistogramVec,
    pub in_flight_extractions: IntGauge,
    pub cache_operations: IntCounterVec,
    pub cache_size: IntGauge,
    pub url_transformations: IntCounterVec,
    pub rate_limited: IntCounter,
}

impl ServiceMetrics {
    /// Create a fresh registry with every metric family registered
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let extraction_attempts = IntCounterVec::new(
            Opts::new(
                "extractor_extraction_attempts_total",
                "Total number of extraction attempts",
            ),
            &["success"],
        )?;
        registry.register(Box::new(extraction_attempts.clone()))?;

        let extraction_duration = Histogram::with_opts(
            HistogramOpts::new(
                "extractor_extraction_duration_seconds",
                "Time spent extracting content",
            )
            .buckets(EXTRACTION_DURATION_BUCKETS.to_vec()),
        )?;
        registry.register(Box::new(extraction_duration.clone()))?;

        let extraction_score = Histogram::with_opts(
            HistogramOpts::new("extractor_extraction_score", "Extraction quality scores")
                .buckets(score_buckets()),
        )?;
        registry.register(Box::new(extraction_score.clone()))?;

        let fallback_requests = IntCounter::new(
            "extractor_fallback_requests_total",
            "Total number of fallback extraction requests",
        )?;
        registry.register(Box::new(fallback_requests.clone()))?;

        let fallback_duration = Histogram::with_opts(
            HistogramOpts::new(
                "extractor_readability_fallback_duration_seconds",
                "Time spent in fallback extraction",
            )
            .buckets(FALLBACK_DURATION_BUCKETS.to_vec()),
        )?;
        registry.register(Box::new(fallback_duration.clone()))?;

        let http_requests = IntCounterVec::new(
            Opts::new("extractor_http_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "status_code"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "extractor_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(HTTP_DURATION_BUCKETS.to_vec()),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        let in_flight_extractions = IntGauge::new(
            "extractor_in_flight_extractions",
            "Extractions currently running on the blocking pool",
        )?;
        registry.register(Box::new(in_flight_extractions.clone()))?;

        let cache_operations = IntCounterVec::new(
            Opts::new("extractor_cache_operations_total", "Total cache operations"),
            &["operation"],
        )?;
        registry.register(Box::new(cache_operations.clone()))?;

        let cache_size = IntGauge::new("extractor_cache_size", "Current cache size")?;
        registry.register(Box::new(cache_size.clone()))?;

        let url_transformations = IntCounterVec::new(
            Opts::new(
                "extractor_url_transformations_total",
                "URL transformations applied",
            ),
            &["type"],
        )?;
        registry.register(Box::new(url_transformations.clone()))?;

        let rate_limited = IntCounter::new(
            "extractor_rate_limited_total",
            "Requests rejected by the rate limiter",
        )?;
        registry.register(Box::new(rate_limited.clone()))?;

        // Export both outcomes from the first scrape
        extraction_attempts.with_label_values(&["true"]);
        extraction_attempts.with_label_values(&["false"]);

        Ok(Self {
            registry,
            extraction_attempts,
            extraction_duration,
            extraction_score,
            fallback_requests,
            fallback_duration,
            http_requests,
            http_request_duration,
            in_flight_extractions,
            cache_operations,
            cache_size,
            url_transformations,
            rate_limited,
        })
    }

    pub fn record_extraction(&self, success: bool, duration: Duration) {
        let label = if success { "true" } else { "false" };
        self.extraction_attempts.with_label_values(&[label]).inc();
        self.extraction_duration.observe(duration.as_secs_f64());
    }

    pub fn record_fallback(&self, duration: Duration) {
        self.fallback_requests.inc();
        self.fallback_duration.observe(duration.as_secs_f64());
    }

    pub fn observe_score(&self, score: f64) {
        self.extraction_score.observe(score);
    }

    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration: Duration,
    ) {
        let status = status_code.to_string();
        self.http_requests
            .with_label_values(&[method, endpoint, &status])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, endpoint])
            .observe(duration.as_secs_f64());
    }

    pub fn record_cache_operation(&self, operation: CacheOperation) {
        self.cache_operations
            .with_label_values(&[operation.as_str()])
            .inc();
    }

    pub fn set_cache_size(&self, size: usize) {
        self.cache_size.set(i64::try_from(size).unwrap_or(i64::MAX));
    }

    pub fn record_url_transformation(&self, kind: &str) {
        self.url_transformations.with_label_values(&[kind]).inc();
    }

    pub fn record_rate_limited(&self) {
        self.rate_limited.inc();
    }

    /// Increment the in-flight gauge until the returned guard is dropped
    pub fn in_flight(&self) -> InFlightGuard {
        self.in_flight_extractions.inc();
        InFlightGuard {
            gauge: self.in_flight_extractions.clone(),
        }
    }

    /// Content type of [`encode`](Self::encode) output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Render every registered family in the Prometheus text format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Decrements the in-flight gauge on drop
pub struct InFlightGuard {
    gauge: IntGauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
