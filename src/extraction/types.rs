// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for content extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Engine that produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionEngine {
    /// Readability library (primary)
    Readability,
    /// CSS selector heuristic (fallback)
    Selector,
}

impl ExtractionEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionEngine::Readability => "readability",
            ExtractionEngine::Selector => "selector",
        }
    }
}

impl fmt::Display for ExtractionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single engine run, before the pipeline settles the title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExtraction {
    pub title: Option<String>,
    pub text: String,
}

/// Final extraction handed to the API layer
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub title: Option<String>,
    pub text: String,
    pub engine: ExtractionEngine,
}

/// Options applied by the readability engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Keep `<table>` content (tables are stripped before extraction otherwise)
    pub include_tables: bool,
    /// Minimum trimmed character count for a result to be accepted
    pub min_text_length: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_tables: true,
            min_text_length: 1,
        }
    }
}

/// Errors that can occur during extraction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    /// No engine produced usable text
    #[error("failed to extract content")]
    NoContent,

    /// The engine itself reported an error
    #[error("{engine} extraction error: {message}")]
    Engine {
        engine: ExtractionEngine,
        message: String,
    },

    /// The engine panicked; caught by the pipeline
    #[error("{engine} extraction panicked: {message}")]
    Panicked {
        engine: ExtractionEngine,
        message: String,
    },

    /// Document nesting is beyond what the engine can walk safely
    #[error("document nesting depth {depth} exceeds {limit}")]
    TooDeep { depth: usize, limit: usize },

    /// Extraction did not finish within the configured timeout
    #[error("extraction timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The blocking extraction task could not be joined
    #[error("extraction task failed: {0}")]
    Task(String),
}
