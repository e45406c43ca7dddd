// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content extraction
//!
//! Boilerplate removal is delegated to the `readability` crate. This module
//! prepares its input, picks the title from page metadata, falls back to a
//! selector heuristic when the library finds nothing, and scores the result.
//!
//! ## Usage
//! ```rust,no_run
//! use readability_service::extraction::{ExtractionPipeline, ScoreCalculator};
//! use readability_service::config::ServiceConfig;
//! use url::Url;
//!
//! let pipeline = ExtractionPipeline::from_config(&ServiceConfig::default());
//! let url = Url::parse("https://example.com/post").unwrap();
//! let extraction = pipeline.extract("<html>...</html>", &url).unwrap();
//! let score = ScoreCalculator::default().calculate(extraction.title.as_deref(), &extraction.text);
//! ```

pub mod engine;
pub mod metadata;
pub mod pipeline;
pub mod preprocess;
pub mod readability;
pub mod score;
pub mod selector;
pub mod text;
pub mod types;

pub use engine::ContentExtractor;
pub use metadata::extract_title;
pub use pipeline::ExtractionPipeline;
pub use readability::{ReadabilityExtractor, MAX_NESTING_DEPTH};
pub use score::{ScoreCalculator, TEXT_LENGTH_WEIGHT, TITLE_BONUS, WORD_COUNT_WEIGHT};
pub use selector::{extract_main_content, SelectorExtractor};
pub use types::{ExtractOptions, Extraction, ExtractionEngine, ExtractionError, RawExtraction};
