// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction pipeline: primary engine, optional fallback, metrics

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{debug, info, warn};
use url::Url;

use super::engine::ContentExtractor;
use super::metadata::extract_title;
use super::readability::ReadabilityExtractor;
use super::score::ScoreCalculator;
use super::selector::SelectorExtractor;
use super::types::{Extraction, ExtractionError, RawExtraction};
use crate::config::ServiceConfig;
use crate::monitoring::ServiceMetrics;

const PROBE_HTML: &str = "<html><body>test</body></html>";
const PROBE_URL: &str = "http://localhost/";

pub struct ExtractionPipeline {
    primary: Arc<dyn ContentExtractor>,
    fallback: Option<Arc<dyn ContentExtractor>>,
    min_text_length: usize,
    scorer: ScoreCalculator,
    score_threshold: f64,
    metrics: Option<Arc<ServiceMetrics>>,
    available: OnceLock<bool>,
}

impl ExtractionPipeline {
    pub fn new(primary: Arc<dyn ContentExtractor>) -> Self {
        Self {
            primary,
            fallback: None,
            min_text_length: 1,
            scorer: ScoreCalculator::default(),
            score_threshold: 0.0,
            metrics: None,
            available: OnceLock::new(),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ContentExtractor>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length.max(1);
        self
    }

    /// Send primary results scoring below `threshold` to the fallback
    pub fn with_score_threshold(mut self, scorer: ScoreCalculator, threshold: f64) -> Self {
        self.scorer = scorer;
        self.score_threshold = threshold;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ServiceMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Readability primary, selector fallback when enabled
    pub fn from_config(config: &ServiceConfig) -> Self {
        let primary = Arc::new(ReadabilityExtractor::new(config.extract_options()));
        let pipeline = Self::new(primary)
            .with_min_text_length(config.min_text_length)
            .with_score_threshold(
                ScoreCalculator::new(config.score_log_scale),
                config.score_threshold,
            );

        if config.enable_fallback {
            pipeline.with_fallback(Arc::new(SelectorExtractor::new()))
        } else {
            pipeline
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Run the engines against `html`
    ///
    /// Every call records one extraction attempt. Engine errors and panics
    /// count as an empty result, so the fallback still gets its turn. A
    /// primary result scoring below the threshold also goes to the fallback,
    /// and is kept if the fallback finds nothing.
    pub fn extract(&self, html: &str, url: &Url) -> Result<Extraction, ExtractionError> {
        let start = Instant::now();
        let result = self.run_engines(html, url);

        if let Some(metrics) = &self.metrics {
            metrics.record_extraction(result.is_ok(), start.elapsed());
        }

        match &result {
            Ok(extraction) => info!(
                "Extracted {} chars from {} using {}",
                extraction.text.chars().count(),
                url,
                extraction.engine
            ),
            Err(e) => warn!("Extraction failed for {}: {}", url, e),
        }

        result
    }

    fn run_engines(&self, html: &str, url: &Url) -> Result<Extraction, ExtractionError> {
        let mut below_threshold = None;
        let mut last_error = ExtractionError::NoContent;

        let reason = match run_guarded(self.primary.as_ref(), html, url) {
            Ok(raw) if self.accepts(&raw) => {
                let extraction = self.finish(raw, html, self.primary.as_ref());
                let score = self
                    .scorer
                    .calculate(extraction.title.as_deref(), &extraction.text);
                if self.fallback.is_none() || score >= self.score_threshold {
                    return Ok(extraction);
                }
                below_threshold = Some(extraction);
                format!("score {:.2} below {:.2}", score, self.score_threshold)
            }
            Ok(_) => "no usable content".to_string(),
            Err(e) => {
                let reason = e.to_string();
                last_error = e;
                reason
            }
        };

        if let Some(fallback) = &self.fallback {
            warn!(
                "{} result rejected for {} ({}), trying {}",
                self.primary.engine(),
                url,
                reason,
                fallback.engine()
            );

            let start = Instant::now();
            let result = run_guarded(fallback.as_ref(), html, url);
            if let Some(metrics) = &self.metrics {
                metrics.record_fallback(start.elapsed());
            }

            match result {
                Ok(raw) if self.accepts(&raw) => {
                    return Ok(self.finish(raw, html, fallback.as_ref()));
                }
                Ok(_) => {}
                Err(e) => last_error = e,
            }
        }

        if let Some(extraction) = below_threshold {
            debug!("Fallback found nothing, keeping low-scoring primary result");
            return Ok(extraction);
        }

        debug!("No engine produced content: {}", last_error);
        Err(match last_error {
            ExtractionError::Panicked { .. }
            | ExtractionError::Engine { .. }
            | ExtractionError::TooDeep { .. } => last_error,
            _ => ExtractionError::NoContent,
        })
    }

    fn accepts(&self, raw: &RawExtraction) -> bool {
        raw.text.trim().chars().count() >= self.min_text_length
    }

    fn finish(&self, raw: RawExtraction, html: &str, engine: &dyn ContentExtractor) -> Extraction {
        Extraction {
            title: extract_title(html).or(raw.title),
            text: raw.text.trim().to_string(),
            engine: engine.engine(),
        }
    }

    /// Whether the primary engine works at all
    ///
    /// Probed once per pipeline instance. An engine that runs but finds
    /// nothing in the probe document still counts as available.
    pub fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.probe())
    }

    fn probe(&self) -> bool {
        let url = match Url::parse(PROBE_URL) {
            Ok(url) => url,
            Err(_) => return false,
        };

        match run_guarded(self.primary.as_ref(), PROBE_HTML, &url) {
            Ok(_) | Err(ExtractionError::NoContent) => true,
            Err(e) => {
                warn!("Extractor availability probe failed: {}", e);
                false
            }
        }
    }
}

/// Run one engine, converting a panic into [`ExtractionError::Panicked`]
fn run_guarded(
    engine: &dyn ContentExtractor,
    html: &str,
    url: &Url,
) -> Result<RawExtraction, ExtractionError> {
    catch_unwind(AssertUnwindSafe(|| engine.extract(html, url))).unwrap_or_else(|payload| {
        Err(ExtractionError::Panicked {
            engine: engine.engine(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
