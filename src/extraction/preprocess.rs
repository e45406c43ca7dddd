// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML preprocessing before handing a document to an engine

use std::collections::HashMap;

use scraper::{Html, Selector};

/// Remove every element matching one of `tags` (with its subtree)
///
/// Returns the re-serialised document. If the tag list does not form a
/// valid selector the input is returned unchanged.
pub fn strip_elements(html: &str, tags: &[&str]) -> String {
    if tags.is_empty() {
        return html.to_string();
    }

    let selector_str = tags.join(", ");
    let selector = match Selector::parse(&selector_str) {
        Ok(selector) => selector,
        Err(_) => return html.to_string(),
    };

    let mut document = Html::parse_document(html);
    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document.html()
}

/// Deepest element nesting in the document
///
/// Walks the parsed tree in document order without recursion, so it is
/// safe on documents that would overflow a recursive walker.
pub fn nesting_depth(html: &str) -> usize {
    let document = Html::parse_document(html);
    let mut depths = HashMap::new();
    let mut max_depth = 0;

    for node in document.tree.root().descendants() {
        let parent_depth = node
            .parent()
            .and_then(|parent| depths.get(&parent.id()).copied())
            .unwrap_or(0);
        let depth = if node.value().is_element() {
            parent_depth + 1
        } else {
            parent_depth
        };
        if node.has_children() {
            depths.insert(node.id(), depth);
        }
        max_depth = max_depth.max(depth);
    }

    max_depth
}
