// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Extraction endpoint tests for POST /extract
//!
//! These tests verify that:
//! - Valid HTML returns title, text, score and engine
//! - Empty or whitespace HTML is rejected with a validation error naming `html`
//! - Missing or relative URLs are rejected with a validation error naming `url`
//! - Malformed JSON gives 400
//! - Engine failures and panics give 422 with the extraction_failed envelope
//! - Slow extractions time out with 504
//! - A full concurrency gate gives 503

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use readability_service::{
    config::ServiceConfig,
    extraction::{ExtractionPipeline, ScoreCalculator},
};
use serde_json::json;
use std::time::Duration;

use super::common::*;

#[cfg(test)]
mod extract_endpoint_tests {
    use super::*;

    /// Test 1: Real readability pipeline on a small article
    #[tokio::test]
    async fn test_extract_article() {
        let config = test_config();
        let pipeline = ExtractionPipeline::from_config(&config);
        let state = state_without_fetcher(config, pipeline);

        let (status, body) = send_json(
            app(&state),
            json_post(
                "/extract",
                json!({"html": SAMPLE_ARTICLE, "url": "https://example.com/article"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["success"], true);
        assert_eq!(body["title"], "Example Title");
        assert!(body["text"].as_str().unwrap().contains("Hello world"));
        assert!(body["score"].as_f64().unwrap() > 5.0);
        assert!(body["engine"].is_string());
    }

    /// Test 2: Score in the response matches the calculator
    #[tokio::test]
    async fn test_extract_score_matches_calculator() {
        let text = "Hello world. This is a sample content paragraph.";
        let state = state_without_fetcher(test_config(), text_pipeline(Some("Title"), text));

        let (status, body) = send_json(
            app(&state),
            json_post(
                "/extract",
                json!({"html": "<html><body><p>x</p></body></html>", "url": "https://example.com"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let expected = ScoreCalculator::default().calculate(Some("Title"), text);
        assert!((body["score"].as_f64().unwrap() - expected).abs() < 1e-9);
        assert_eq!(body["engine"], "readability");
    }

    /// Test 3: Missing title is reported as an empty string
    #[tokio::test]
    async fn test_extract_without_title() {
        let state = state_without_fetcher(test_config(), text_pipeline(None, "Just body text"));

        let (status, body) = send_json(
            app(&state),
            json_post(
                "/extract",
                json!({"html": "<html><body>Just body text</body></html>", "url": "https://example.com"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "");
        assert!(body["score"].as_f64().unwrap() < 5.0);
    }

    /// Test 4: Empty and whitespace HTML fail validation
    #[tokio::test]
    async fn test_extract_empty_html() {
        for html in ["", "   \n\t  "] {
            let state = state_without_fetcher(test_config(), text_pipeline(None, "unused"));
            let (status, body) = send_json(
                app(&state),
                json_post("/extract", json!({"html": html, "url": "https://example.com"})),
            )
            .await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error_type"], "validation_error");
            assert_eq!(body["details"]["field"], "html");
        }
    }

    /// Test 5: Missing fields fail validation
    #[tokio::test]
    async fn test_extract_missing_fields() {
        let state = state_without_fetcher(test_config(), text_pipeline(None, "unused"));

        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"url": "https://example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["field"], "html");

        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"html": "<p>x</p>"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["field"], "url");
    }

    /// Test 6: Relative URL fails validation
    #[tokio::test]
    async fn test_extract_relative_url() {
        let state = state_without_fetcher(test_config(), text_pipeline(None, "unused"));

        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"html": "<p>x</p>", "url": "/just/a/path"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["field"], "url");
    }

    /// Test 7: Oversized HTML fails validation
    #[tokio::test]
    async fn test_extract_html_too_large() {
        let config = ServiceConfig {
            max_html_bytes: 64,
            ..test_config()
        };
        let state = state_without_fetcher(config, text_pipeline(None, "unused"));
        let html = format!("<html><body>{}</body></html>", "x".repeat(50));

        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"html": html, "url": "https://example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"]["field"], "html");

        // Far beyond the limit the body itself is refused
        let html = format!("<html><body>{}</body></html>", "x".repeat(500));
        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"html": html, "url": "https://example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error_type"], "payload_too_large");
    }

    /// Test 8: Malformed JSON gives 400
    #[tokio::test]
    async fn test_extract_malformed_json() {
        let state = state_without_fetcher(test_config(), text_pipeline(None, "unused"));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/extract")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send_json(app(&state), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_type"], "invalid_request");
    }

    /// Test 9: Engine producing nothing gives extraction_failed
    #[tokio::test]
    async fn test_extract_no_content() {
        let state = state_without_fetcher(test_config(), text_pipeline(None, "   "));

        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"html": "<p>x</p>", "url": "https://example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "extraction_failed");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Content extraction failed:"));
    }

    /// Test 10: Engine errors and panics are caught
    #[tokio::test]
    async fn test_extract_engine_failures() {
        for stub in [Stub::Fail, Stub::Panic] {
            let state = state_without_fetcher(test_config(), stub_pipeline(stub));
            let (status, body) = send_json(
                app(&state),
                json_post("/extract", json!({"html": "<p>x</p>", "url": "https://example.com"})),
            )
            .await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error_type"], "extraction_failed");
        }
    }

    /// Test 11: Selector fallback rescues an empty primary result
    #[tokio::test]
    async fn test_extract_uses_fallback() {
        let pipeline = text_pipeline(None, "").with_fallback(std::sync::Arc::new(
            readability_service::extraction::SelectorExtractor::new(),
        ));
        let state = state_without_fetcher(test_config(), pipeline);

        let (status, body) = send_json(
            app(&state),
            json_post(
                "/extract",
                json!({"html": "<html><body><p>Fallback body</p></body></html>", "url": "https://example.com"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["engine"], "selector");
        assert_eq!(body["text"], "Fallback body");
        assert_eq!(state.metrics.fallback_requests.get(), 1);
    }

    /// Test 12: Extraction exceeding the timeout gives 504
    #[tokio::test]
    async fn test_extract_timeout() {
        let config = ServiceConfig {
            extraction_timeout_secs: 1,
            ..test_config()
        };
        let state = state_without_fetcher(
            config,
            stub_pipeline(Stub::Slow(Duration::from_millis(1500))),
        );

        let (status, body) = send_json(
            app(&state),
            json_post("/extract", json!({"html": "<p>x</p>", "url": "https://example.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error_type"], "timeout");
    }

    /// Test 13: Requests beyond the gate capacity get 503
    #[tokio::test]
    async fn test_extract_gate_full() {
        let config = ServiceConfig {
            max_concurrency: 1,
            queue_timeout_ms: 50,
            ..test_config()
        };
        let state = state_without_fetcher(
            config,
            stub_pipeline(Stub::Slow(Duration::from_millis(500))),
        );

        let request = || json_post("/extract", json!({"html": "<p>x</p>", "url": "https://example.com"}));
        let (first, second) = tokio::join!(
            send_json(app(&state), request()),
            send_json(app(&state), request())
        );

        let mut statuses = vec![first.0, second.0];
        statuses.sort();
        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::SERVICE_UNAVAILABLE]
        );
    }

    fn nested_divs(depth: usize) -> String {
        format!(
            "<html><body>{}<p>deep text</p>{}</body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        )
    }

    /// Test 14: Deeply nested markup goes to the selector engine
    #[tokio::test]
    async fn test_extract_deeply_nested_uses_fallback() {
        let config = test_config();
        let pipeline = ExtractionPipeline::from_config(&config);
        let state = state_without_fetcher(config, pipeline);

        let (status, body) = send_json(
            app(&state),
            json_post(
                "/extract",
                json!({"html": nested_divs(10_000), "url": "https://example.com"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["engine"], "selector");
        assert_eq!(body["text"], "deep text");
        assert_eq!(state.metrics.fallback_requests.get(), 1);
    }

    /// Test 15: Deeply nested markup without a fallback is refused
    #[tokio::test]
    async fn test_extract_deeply_nested_without_fallback() {
        let config = ServiceConfig {
            enable_fallback: false,
            ..test_config()
        };
        let pipeline = ExtractionPipeline::from_config(&config);
        let state = state_without_fetcher(config, pipeline);

        let (status, body) = send_json(
            app(&state),
            json_post(
                "/extract",
                json!({"html": nested_divs(10_000), "url": "https://example.com"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "extraction_failed");
        assert!(body["message"].as_str().unwrap().contains("nesting depth"));
    }
}
