// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Everything is read from environment variables (a `.env` file is loaded
//! first by the binary). `validate()` is called once at startup.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::extraction::ExtractOptions;
use crate::fetch::FetchConfig;

/// Top-level configuration for the readability service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind host (default: 0.0.0.0)
    pub host: String,
    /// Bind port (default: 8000)
    pub port: u16,
    /// Keep `<table>` content in extracted text (default: true)
    pub include_tables: bool,
    /// Run the selector extractor when readability yields nothing (default: true)
    pub enable_fallback: bool,
    /// Minimum trimmed characters for an engine result to count (default: 1)
    pub min_text_length: usize,
    /// Use log10 scaling in the quality score (default: true)
    pub score_log_scale: bool,
    /// Primary results scoring below this go to the fallback engine (default: 0.0)
    pub score_threshold: f64,
    /// Maximum concurrent extractions (default: 4)
    pub max_concurrency: usize,
    /// Maximum time a request waits for an extraction slot (default: 10000ms)
    pub queue_timeout_ms: u64,
    /// Extraction timeout in seconds (default: 30)
    pub extraction_timeout_secs: u64,
    /// Maximum accepted HTML size in bytes (default: 10 MiB)
    pub max_html_bytes: usize,
    /// Extraction cache TTL in seconds (default: 86400)
    pub cache_ttl_secs: u64,
    /// Maximum extraction cache entries (default: 1000)
    pub cache_max_entries: usize,
    /// Per-client requests per minute on /extract/url (default: 100)
    pub rate_limit_per_minute: u32,
    /// Outbound page fetching
    pub fetch: FetchConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_html_bytes = parse_or(&lookup, "MAX_HTML_BYTES", defaults.max_html_bytes);

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            include_tables: lookup("INCLUDE_TABLES")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.include_tables),
            enable_fallback: lookup("ENABLE_FALLBACK")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.enable_fallback),
            min_text_length: parse_or(&lookup, "MIN_TEXT_LENGTH", defaults.min_text_length),
            score_log_scale: lookup("SCORE_LOG_SCALE")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.score_log_scale),
            score_threshold: parse_or(&lookup, "SCORE_THRESHOLD", defaults.score_threshold),
            max_concurrency: parse_or(&lookup, "MAX_CONCURRENCY", defaults.max_concurrency),
            queue_timeout_ms: parse_or(&lookup, "QUEUE_TIMEOUT_MS", defaults.queue_timeout_ms),
            extraction_timeout_secs: parse_or(
                &lookup,
                "EXTRACTION_TIMEOUT",
                defaults.extraction_timeout_secs,
            ),
            max_html_bytes,
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_max_entries: parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            rate_limit_per_minute: parse_or(
                &lookup,
                "RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute,
            ),
            fetch: FetchConfig::from_lookup(&lookup, max_html_bytes),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("MAX_CONCURRENCY must be at least 1".to_string());
        }
        if self.queue_timeout_ms == 0 {
            return Err("QUEUE_TIMEOUT_MS must be at least 1".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("EXTRACTION_TIMEOUT must be at least 1".to_string());
        }
        if !self.score_threshold.is_finite() || self.score_threshold < 0.0 {
            return Err("SCORE_THRESHOLD must be a non-negative number".to_string());
        }
        if self.max_html_bytes == 0 {
            return Err("MAX_HTML_BYTES must be at least 1".to_string());
        }
        if self.cache_max_entries == 0 {
            return Err("CACHE_MAX_ENTRIES must be at least 1".to_string());
        }
        if self.cache_ttl_secs == 0 {
            return Err("CACHE_TTL_SECS must be at least 1".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            return Err("RATE_LIMIT_PER_MINUTE must be at least 1".to_string());
        }
        self.fetch.validate()
    }

    /// Socket address to bind the HTTP server to
    pub fn listen_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("invalid listen address {}:{}: {}", self.host, self.port, e))
    }

    /// Options handed to the readability engine
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            include_tables: self.include_tables,
            min_text_length: self.min_text_length,
        }
    }

    pub fn queue_timeout(&self) -> Duration {
        Duration::from_millis(self.queue_timeout_ms)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            include_tables: true,
            enable_fallback: true,
            min_text_length: 1,
            score_log_scale: true,
            score_threshold: 0.0,
            max_concurrency: 4,
            queue_timeout_ms: 10_000,
            extraction_timeout_secs: 30,
            max_html_bytes: 10 * 1024 * 1024,
            cache_ttl_secs: 86_400,
            cache_max_entries: 1000,
            rate_limit_per_minute: 100,
            fetch: FetchConfig::default(),
        }
    }
}

pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
