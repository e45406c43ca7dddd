// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page metadata extraction
//!
//! The readability engine only reports the `<title>` element, which often
//! carries a " | Site Name" suffix. Social metadata usually has the clean
//! headline, so it is preferred.

use scraper::{Html, Selector};

use super::text::{collapse_whitespace, non_blank};

/// Meta tags checked in order, as (selector, attribute)
const META_TITLE_SOURCES: &[(&str, &str)] = &[
    ("meta[property='og:title']", "content"),
    ("meta[name='twitter:title']", "content"),
];

/// Extract the page title from HTML
///
/// Tries, in order: `og:title`, `twitter:title`, `<title>`, first `<h1>`.
/// Returns `None` when none of them holds non-blank text.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    title_from_document(&document)
}

fn title_from_document(document: &Html) -> Option<String> {
    for (selector_str, attr) in META_TITLE_SOURCES {
        if let Ok(selector) = Selector::parse(selector_str) {
            let found = document
                .select(&selector)
                .filter_map(|el| el.value().attr(attr))
                .map(collapse_whitespace)
                .find_map(non_blank);
            if found.is_some() {
                return found;
            }
        }
    }

    for selector_str in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            let found = document
                .select(&selector)
                .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
                .find_map(non_blank);
            if found.is_some() {
                return found;
            }
        }
    }

    None
}
