// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! URL extraction endpoint tests for POST /extract/url
//!
//! These tests verify that:
//! - A fetched page is extracted and cached; the second call is a cache hit
//! - AMP, mobile and print variants are normalised before fetching
//! - Private addresses, localhost and internal service ports are refused
//! - Upstream failures map to 400/413/502/504
//! - Clients are rate limited per forwarded address

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use readability_service::{config::ServiceConfig, fetch::FetchError};
use serde_json::json;
use url::Url;

use super::common::*;

fn url_request(url: &str) -> Request<Body> {
    json_post("/extract/url", json!({ "url": url }))
}

fn url_request_from(client: &str, url: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/extract/url")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap()
}

/// Mock source that must not be reached
fn unreachable_source() -> MockSource {
    let mut source = MockSource::new();
    source.expect_fetch().never();
    source
}

fn failing_source(error: FetchError) -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .times(1)
        .returning(move |_| Err(error.clone()));
    source
}

#[cfg(test)]
mod extract_url_endpoint_tests {
    use super::*;

    /// Test 1: Fetch, extract, then serve from cache
    #[tokio::test]
    async fn test_extract_url_and_cache() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|url| Ok(html_page(url, SAMPLE_ARTICLE)));
        let state = build_state(
            test_config(),
            text_pipeline(Some("Example Title"), "Hello world body"),
            source,
        );

        let (status, body) =
            send_json(app(&state), url_request("https://example.com/article")).await;
        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["cached"], false);
        assert_eq!(body["title"], "Example Title");
        assert_eq!(body["text"], "Hello world body");
        assert_eq!(body["engine"], "readability");
        assert_eq!(body["url"], "https://example.com/article");
        let first_score = body["score"].as_f64().unwrap();

        let (status, body) =
            send_json(app(&state), url_request("https://example.com/article")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], true);
        assert_eq!(body["score"].as_f64().unwrap(), first_score);

        assert_eq!(state.cache.len(), 1);
        assert_eq!(state.metrics.cache_operations.with_label_values(&["hit"]).get(), 1);
        assert_eq!(state.metrics.cache_operations.with_label_values(&["miss"]).get(), 1);
        assert_eq!(state.metrics.cache_size.get(), 1);
    }

    /// Test 2: URL variants are normalised before fetching
    #[tokio::test]
    async fn test_extract_url_normalisation() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .withf(|url: &Url| url.as_str() == "https://www.example.com/news/story")
            .times(1)
            .returning(|url| Ok(html_page(url, SAMPLE_ARTICLE)));
        let state = build_state(test_config(), text_pipeline(None, "Story body"), source);

        let (status, body) = send_json(
            app(&state),
            url_request("https://mobile.example.com/news/amp/story?print=1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(body["url"], "https://www.example.com/news/story");
        for kind in ["amp", "mobile", "print"] {
            assert_eq!(
                state
                    .metrics
                    .url_transformations
                    .with_label_values(&[kind])
                    .get(),
                1
            );
        }
    }

    /// Test 2b: Expired entries leave the cache size gauge
    #[tokio::test]
    async fn test_extract_url_cache_expiry_updates_size() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|url| Ok(html_page(url, SAMPLE_ARTICLE)));
        source
            .expect_fetch()
            .times(1)
            .returning(|url| Err(FetchError::Timeout(url.to_string())));
        let config = ServiceConfig {
            cache_ttl_secs: 0,
            ..test_config()
        };
        let state = build_state(config, text_pipeline(None, "Body"), source);

        let (status, _) =
            send_json(app(&state), url_request("https://example.com/short-lived")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.metrics.cache_size.get(), 1);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let (status, _) =
            send_json(app(&state), url_request("https://example.com/short-lived")).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(state.cache.is_empty());
        assert_eq!(state.metrics.cache_size.get(), 0);
        assert_eq!(state.metrics.cache_operations.with_label_values(&["miss"]).get(), 2);
    }

    /// Test 3: Private and local targets are forbidden
    #[tokio::test]
    async fn test_extract_url_ssrf_blocked() {
        for target in [
            "http://127.0.0.1/admin",
            "http://localhost:8080/",
            "http://192.168.1.10/",
            "http://[::1]/",
            "http://169.254.169.254/latest/meta-data",
        ] {
            let state = build_state(
                test_config(),
                text_pipeline(None, "unused"),
                unreachable_source(),
            );
            let (status, body) = send_json(app(&state), url_request(target)).await;

            assert_eq!(status, StatusCode::FORBIDDEN, "target {}", target);
            assert_eq!(body["error_type"], "forbidden");
        }
    }

    /// Test 4: Invalid URLs and internal ports are rejected with 400
    #[tokio::test]
    async fn test_extract_url_invalid() {
        for target in [
            "",
            "not a url",
            "ftp://example.com/file",
            "http://example.com:6379/",
            "https://example.com:22/",
        ] {
            let state = build_state(
                test_config(),
                text_pipeline(None, "unused"),
                unreachable_source(),
            );
            let (status, body) = send_json(app(&state), url_request(target)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "target {:?}", target);
            assert_eq!(body["error_type"], "invalid_request");
        }
    }

    /// Test 5: Fetch failures map to HTTP errors
    #[tokio::test]
    async fn test_extract_url_fetch_errors() {
        let cases = [
            (
                FetchError::UpstreamStatus {
                    status: 404,
                    url: "https://example.com/missing".to_string(),
                },
                StatusCode::BAD_GATEWAY,
                "upstream_error",
            ),
            (
                FetchError::UnsupportedContentType("application/pdf".to_string()),
                StatusCode::BAD_REQUEST,
                "invalid_request",
            ),
            (
                FetchError::TooLarge { limit: 1024 },
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
            ),
            (
                FetchError::Timeout("https://example.com/missing".to_string()),
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
            ),
        ];

        for (error, expected_status, expected_type) in cases {
            let state = build_state(
                test_config(),
                text_pipeline(None, "unused"),
                failing_source(error),
            );
            let (status, body) =
                send_json(app(&state), url_request("https://example.com/missing")).await;

            assert_eq!(status, expected_status);
            assert_eq!(body["error_type"], expected_type);
            assert!(state.cache.is_empty());
        }
    }

    /// Test 6: Extraction failure is not cached
    #[tokio::test]
    async fn test_extract_url_extraction_failure() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .times(2)
            .returning(|url| Ok(html_page(url, "<html><body></body></html>")));
        let state = build_state(test_config(), text_pipeline(None, ""), source);

        for _ in 0..2 {
            let (status, body) =
                send_json(app(&state), url_request("https://example.com/empty")).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error_type"], "extraction_failed");
        }
        assert!(state.cache.is_empty());
    }

    /// Test 7: Per-client rate limiting
    #[tokio::test]
    async fn test_extract_url_rate_limited() {
        let config = ServiceConfig {
            rate_limit_per_minute: 2,
            ..test_config()
        };
        let state = build_state(config, text_pipeline(None, "unused"), unreachable_source());

        // Empty URLs fail validation, which happens after the limiter
        for _ in 0..2 {
            let (status, _) = send_json(app(&state), url_request_from("203.0.113.9", "")).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (status, body) = send_json(app(&state), url_request_from("203.0.113.9", "")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error_type"], "rate_limit_exceeded");
        assert!(body["details"]["retry_after"].as_u64().unwrap() >= 1);
        assert_eq!(state.metrics.rate_limited.get(), 1);

        let (status, _) = send_json(app(&state), url_request_from("198.51.100.4", "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
