// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Readability engine
//!
//! Thin wrapper over the `readability` crate. All boilerplate removal
//! happens inside the library; this module only prepares the input and
//! normalises the output.

use std::borrow::Cow;
use std::io::Cursor;

use tracing::{debug, warn};
use url::Url;

use super::engine::ContentExtractor;
use super::preprocess::{nesting_depth, strip_elements};
use super::text::{clean_lines, collapse_whitespace, non_blank};
use super::types::{ExtractOptions, ExtractionEngine, ExtractionError, RawExtraction};

/// Deepest element nesting handed to the library
///
/// The library walks the DOM recursively; deeper documents would overflow
/// the stack of the blocking thread it runs on.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Extractor backed by the readability library
#[derive(Debug, Clone, Default)]
pub struct ReadabilityExtractor {
    options: ExtractOptions,
}

impl ReadabilityExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn prepare<'a>(&self, html: &'a str) -> Cow<'a, str> {
        if self.options.include_tables {
            Cow::Borrowed(html)
        } else {
            Cow::Owned(strip_elements(html, &["table"]))
        }
    }
}

impl ContentExtractor for ReadabilityExtractor {
    fn engine(&self) -> ExtractionEngine {
        ExtractionEngine::Readability
    }

    fn extract(&self, html: &str, url: &Url) -> Result<RawExtraction, ExtractionError> {
        let depth = nesting_depth(html);
        if depth > MAX_NESTING_DEPTH {
            warn!(
                "Refusing readability on {}: nesting depth {} exceeds {}",
                url, depth, MAX_NESTING_DEPTH
            );
            return Err(ExtractionError::TooDeep {
                depth,
                limit: MAX_NESTING_DEPTH,
            });
        }

        let prepared = self.prepare(html);
        let mut cursor = Cursor::new(prepared.as_bytes());

        let product = ::readability::extractor::extract(&mut cursor, url).map_err(|e| {
            ExtractionError::Engine {
                engine: ExtractionEngine::Readability,
                message: e.to_string(),
            }
        })?;

        let text = clean_lines(&product.text);
        debug!(
            "Readability produced {} chars for {}",
            text.chars().count(),
            url
        );

        Ok(RawExtraction {
            title: non_blank(collapse_whitespace(&product.title)),
            text,
        })
    }
}
