// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the readability service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-readability-extract-2026-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "readability-extraction",
    "selector-fallback",
    "quality-score",
    "concurrency-gate",
    "url-extraction",
    "ssrf-guard",
    "extraction-cache",
    "rate-limiting",
    "prometheus-metrics",
];

/// Returns the version string printed at startup
pub fn get_version_string() -> String {
    format!("readability-service {} ({})", VERSION_NUMBER, BUILD_DATE)
}
