// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML fetching over HTTP
//!
//! Redirects are followed manually by reqwest's custom policy so each hop
//! is checked against the SSRF literal rules.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Response};
use tracing::{debug, info};
use url::Url;

use super::config::FetchConfig;
use super::error::FetchError;
use super::ssrf::check_literal;

const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// A fetched HTML document
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: Url,
    pub html: String,
    pub content_type: String,
}

/// Source of HTML documents
#[async_trait]
pub trait HtmlSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// reqwest backed [`HtmlSource`]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::with_builder(Client::builder(), config)
    }

    /// Build on top of a preconfigured client builder (custom resolvers, proxies)
    pub fn with_builder(builder: ClientBuilder, config: &FetchConfig) -> Result<Self, FetchError> {
        let client = builder
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(redirect_policy(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    async fn read_body(&self, mut response: Response, url: &Url) -> Result<String, FetchError> {
        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(FetchError::TooLarge {
                    limit: self.max_body_bytes,
                });
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| map_reqwest_error(e, url))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl HtmlSource for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!("Fetching content from: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_html_content_type(&content_type) {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let final_url = response.url().clone();
        let html = self.read_body(response, url).await?;

        info!("Fetched {} bytes from: {}", html.len(), final_url);

        Ok(FetchedPage {
            final_url,
            html,
            content_type,
        })
    }
}

pub fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.trim().to_lowercase();
    HTML_CONTENT_TYPES.iter().any(|t| lower.starts_with(t))
}

fn redirect_policy(max_redirects: usize) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error(FetchError::Http(format!(
                "too many redirects (max {})",
                max_redirects
            )));
        }
        match check_literal(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e),
        }
    })
}

fn map_reqwest_error(error: reqwest::Error, url: &Url) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout(url.to_string());
    }

    // Errors raised by the redirect policy come back wrapped
    let mut source = error.source();
    while let Some(inner) = source {
        if let Some(fetch_error) = inner.downcast_ref::<FetchError>() {
            return fetch_error.clone();
        }
        source = inner.source();
    }

    FetchError::Http(error.to_string())
}
