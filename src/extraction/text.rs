// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Whitespace normalisation for extracted text

/// Collapse all whitespace runs into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalise text while keeping paragraph structure
///
/// Each line has its whitespace collapsed, blank lines are dropped and the
/// remaining lines are joined with `\n`.
pub fn clean_lines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Some(value)` when the value is not blank
pub fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
