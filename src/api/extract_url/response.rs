// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL extract API response types

use serde::{Deserialize, Serialize};

use crate::extraction::ExtractionEngine;
use crate::fetch::CachedExtraction;

/// Response body for POST /extract/url
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractUrlResponse {
    pub title: String,
    pub text: String,
    pub engine: ExtractionEngine,
    pub score: f64,
    /// Whether the result was served from cache
    pub cached: bool,
    /// Normalised URL the content was fetched from
    pub url: String,
}

impl ExtractUrlResponse {
    pub fn from_cached(entry: CachedExtraction, url: String, cached: bool) -> Self {
        Self {
            title: entry.title,
            text: entry.text,
            engine: entry.engine,
            score: entry.score,
            cached,
            url,
        }
    }
}
