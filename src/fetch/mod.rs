// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetching pages by URL
//!
//! Used by `POST /extract/url`: validate the URL, normalise it, check the
//! cache, guard against SSRF, then download the HTML.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod ssrf;
pub mod transform;

pub use cache::{CachedExtraction, ExtractionCache, ExtractionCacheStats};
pub use config::{FetchConfig, DEFAULT_BLOCKED_PORTS};
pub use error::FetchError;
pub use fetcher::{FetchedPage, HtmlSource, HttpFetcher};
pub use ssrf::{check_literal, is_local_hostname, is_private_ip, validate_url, SsrfGuard};
pub use transform::{normalize_url, NormalizedUrl, UrlTransformation};
