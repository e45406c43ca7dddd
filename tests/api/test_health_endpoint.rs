// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health endpoint tests for GET /health

use axum::http::StatusCode;
use readability_service::{extraction::ExtractionPipeline, version};

use super::common::*;

#[cfg(test)]
mod health_endpoint_tests {
    use super::*;

    /// Test 1: Real engine reports healthy
    #[tokio::test]
    async fn test_health_healthy() {
        let config = test_config();
        let pipeline = ExtractionPipeline::from_config(&config);
        let state = state_without_fetcher(config, pipeline);

        let (status, body) = send_json(app(&state), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["extractor_available"], true);
        assert_eq!(body["version"], version::VERSION_NUMBER);
        assert_eq!(body["build"], version::VERSION);
        assert!(body["features"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "readability-extraction"));
        assert!(body["timestamp"].as_i64().unwrap() > 0);
    }

    /// Test 2: A crashing engine is reported, not propagated
    #[tokio::test]
    async fn test_health_unhealthy_engine() {
        let state = state_without_fetcher(test_config(), stub_pipeline(Stub::Panic));

        let (status, body) = send_json(app(&state), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["extractor_available"], false);
    }

    /// Test 3: Probe result is stable across calls
    #[tokio::test]
    async fn test_health_repeated() {
        let state = state_without_fetcher(test_config(), text_pipeline(None, "probe"));

        for _ in 0..3 {
            let (status, body) = send_json(app(&state), get("/health")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
        }
    }
}
