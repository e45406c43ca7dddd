// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch error types

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// URL could not be parsed or uses a scheme other than http/https
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL targets a port reserved for internal services
    #[error("Access to port {0} is not allowed")]
    BlockedPort(u16),

    /// URL resolves to a private or local address
    #[error("{0}")]
    Forbidden(String),

    #[error("Timeout fetching: {0}")]
    Timeout(String),

    /// Transport level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Upstream answered with a non-success status
    #[error("HTTP {status} for: {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Invalid content type for extraction: {0}")]
    UnsupportedContentType(String),

    #[error("Response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}
