// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod extraction;
pub mod fetch;
pub mod monitoring;
pub mod version;

// Re-export main types
pub use api::{create_app, start_server, ApiError, AppState};
pub use config::ServiceConfig;
pub use extraction::{
    ContentExtractor, Extraction, ExtractionEngine, ExtractionError, ExtractionPipeline,
    ReadabilityExtractor, ScoreCalculator, SelectorExtractor,
};
pub use fetch::{FetchError, HtmlSource, HttpFetcher};
pub use monitoring::ServiceMetrics;
