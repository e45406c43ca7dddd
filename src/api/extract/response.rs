// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extract API response types

use serde::{Deserialize, Serialize};

use crate::extraction::{Extraction, ExtractionEngine};

/// Response body for POST /extract
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractResponse {
    /// Page title, empty when none was found
    pub title: String,

    /// Main content text
    pub text: String,

    /// Heuristic quality score
    pub score: f64,

    /// Always true; failures use the error envelope
    pub success: bool,

    /// Engine that produced the text
    pub engine: ExtractionEngine,
}

impl ExtractResponse {
    pub fn new(extraction: Extraction, score: f64) -> Self {
        Self {
            title: extraction.title.unwrap_or_default(),
            text: extraction.text,
            score,
            success: true,
            engine: extraction.engine,
        }
    }
}
