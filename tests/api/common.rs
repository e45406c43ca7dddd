// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for API tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mockall::mock;
use readability_service::{
    api::http_server::{create_app, AppState},
    config::ServiceConfig,
    extraction::{
        ContentExtractor, ExtractionEngine, ExtractionError, ExtractionPipeline, RawExtraction,
    },
    fetch::{FetchError, FetchedPage, HtmlSource},
    monitoring::ServiceMetrics,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use url::Url;

pub const SAMPLE_ARTICLE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Example Title</title></head>
<body>
    <nav><a href="/">Home</a> <a href="/about">About</a></nav>
    <article>
        <h1>Example Title</h1>
        <p>Hello world. This is a sample content paragraph with enough words, commas,
        and sentences to be picked up by the readability scoring, which favours long
        paragraphs with punctuation over short navigation snippets.</p>
        <p>A second paragraph follows with more detail, more commas, and more text so
        that the article container clearly wins over the surrounding page chrome.</p>
    </article>
    <footer>Copyright notice</footer>
</body>
</html>
"#;

mock! {
    pub Source {}

    #[async_trait]
    impl HtmlSource for Source {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
    }
}

/// Behaviour of a [`StubExtractor`]
#[derive(Clone)]
pub enum Stub {
    Text {
        title: Option<&'static str>,
        text: &'static str,
    },
    Slow(Duration),
    Fail,
    Panic,
}

pub struct StubExtractor {
    pub engine: ExtractionEngine,
    pub stub: Stub,
}

impl ContentExtractor for StubExtractor {
    fn engine(&self) -> ExtractionEngine {
        self.engine
    }

    fn extract(&self, _html: &str, _url: &Url) -> Result<RawExtraction, ExtractionError> {
        match &self.stub {
            Stub::Text { title, text } => Ok(RawExtraction {
                title: title.map(String::from),
                text: text.to_string(),
            }),
            Stub::Slow(delay) => {
                std::thread::sleep(*delay);
                Ok(RawExtraction {
                    title: None,
                    text: "slow result".to_string(),
                })
            }
            Stub::Fail => Err(ExtractionError::Engine {
                engine: self.engine,
                message: "unparseable document".to_string(),
            }),
            Stub::Panic => panic!("extractor crashed"),
        }
    }
}

pub fn stub_pipeline(stub: Stub) -> ExtractionPipeline {
    ExtractionPipeline::new(Arc::new(StubExtractor {
        engine: ExtractionEngine::Readability,
        stub,
    }))
}

pub fn text_pipeline(title: Option<&'static str>, text: &'static str) -> ExtractionPipeline {
    stub_pipeline(Stub::Text { title, text })
}

pub fn test_config() -> ServiceConfig {
    ServiceConfig::default()
}

/// Build state around a pipeline and an HTML source
pub fn build_state(
    config: ServiceConfig,
    pipeline: ExtractionPipeline,
    source: impl HtmlSource + 'static,
) -> Arc<AppState> {
    let metrics = Arc::new(ServiceMetrics::new().unwrap());
    Arc::new(AppState::with_components(
        config,
        pipeline,
        Arc::new(source),
        metrics,
    ))
}

/// State whose fetcher must never be called
pub fn state_without_fetcher(config: ServiceConfig, pipeline: ExtractionPipeline) -> Arc<AppState> {
    let mut source = MockSource::new();
    source.expect_fetch().never();
    build_state(config, pipeline, source)
}

pub fn app(state: &Arc<AppState>) -> Router {
    create_app(state.clone())
}

pub fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and parse the JSON body
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Send a request and return the body as text
pub async fn send_text(app: Router, request: Request<Body>) -> (StatusCode, String, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (
        status,
        content_type,
        String::from_utf8_lossy(&body_bytes).into_owned(),
    )
}

pub fn html_page(url: &Url, html: &str) -> FetchedPage {
    FetchedPage {
        final_url: url.clone(),
        html: html.to_string(),
        content_type: "text/html; charset=utf-8".to_string(),
    }
}
