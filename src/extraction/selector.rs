// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Selector-based fallback extraction
//!
//! Used when the readability engine returns nothing. Looks for the usual
//! semantic containers and content class names before settling for the
//! whole `<body>`.

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use super::engine::ContentExtractor;
use super::text::collapse_whitespace;
use super::types::{ExtractionEngine, ExtractionError, RawExtraction};

/// Containers tried in priority order
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".story-body",    // BBC
    ".article__body", // News sites
    ".content-body",
    "#article-body",
    "#content",
    ".prose", // Tailwind
];

/// Text inside these elements is never part of the content
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
];

/// Minimum characters for a container to count as the main content
const MIN_CONTAINER_CHARS: usize = 200;

/// CSS selector heuristic extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorExtractor;

impl SelectorExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContentExtractor for SelectorExtractor {
    fn engine(&self) -> ExtractionEngine {
        ExtractionEngine::Selector
    }

    fn extract(&self, html: &str, _url: &Url) -> Result<RawExtraction, ExtractionError> {
        Ok(RawExtraction {
            title: None,
            text: extract_main_content(html),
        })
    }
}

/// Extract main content from HTML
///
/// Tries the containers in [`CONTENT_SELECTORS`] and returns the first one
/// holding more than 200 characters of visible text. Falls back to the
/// visible text of `<body>`.
pub fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let cleaned = collapse_whitespace(&visible_text(&element));
                if cleaned.chars().count() > MIN_CONTAINER_CHARS {
                    return cleaned;
                }
            }
        }
    }

    extract_body_text(&document)
}

fn extract_body_text(document: &Html) -> String {
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return collapse_whitespace(&visible_text(&body));
        }
    }
    String::new()
}

/// Text of an element, skipping script/style and page chrome
fn visible_text(element: &ElementRef) -> String {
    let mut parts = Vec::new();

    for node in element.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                    .unwrap_or(false)
            });
            if !hidden {
                parts.push(&text[..]);
            }
        }
    }

    parts.join(" ")
}
