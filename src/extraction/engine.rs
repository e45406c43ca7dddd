// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction engine trait definition

use url::Url;

use super::types::{ExtractionEngine, ExtractionError, RawExtraction};

/// Trait for implementing content extraction engines
///
/// Engines are synchronous; the API layer runs them on the blocking pool.
/// The pipeline tries a primary engine and, when it yields nothing, a
/// fallback engine.
pub trait ContentExtractor: Send + Sync {
    /// Engine tag reported in responses and logs
    fn engine(&self) -> ExtractionEngine;

    /// Extract the main content of `html`
    ///
    /// # Arguments
    /// * `html` - Raw HTML document
    /// * `url` - Source URL, used to resolve relative links
    fn extract(&self, html: &str, url: &Url) -> Result<RawExtraction, ExtractionError>;
}
