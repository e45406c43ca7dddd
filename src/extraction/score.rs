// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Heuristic quality score for extracted content
//!
//! Longer text and more words score higher; a non-blank title adds a flat
//! bonus. With log scaling enabled (the default) the score grows slowly, so
//! a 500-word article lands somewhere around 7-8 with a title.

/// Weight applied to the character count term
pub const TEXT_LENGTH_WEIGHT: f64 = 0.8;
/// Weight applied to the word count term
pub const WORD_COUNT_WEIGHT: f64 = 0.2;
/// Flat bonus for a non-blank title
pub const TITLE_BONUS: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator {
    log_scale: bool,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self { log_scale: true }
    }
}

impl ScoreCalculator {
    pub fn new(log_scale: bool) -> Self {
        Self { log_scale }
    }

    pub fn log_scale(&self) -> bool {
        self.log_scale
    }

    /// Score an extraction result. Empty text always scores 0.
    pub fn calculate(&self, title: Option<&str>, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let chars = text.chars().count().max(1) as f64;
        let words = text.split_whitespace().count().max(1) as f64;

        let (length_score, word_score) = if self.log_scale {
            (
                chars.log10() * TEXT_LENGTH_WEIGHT,
                words.log10() * WORD_COUNT_WEIGHT,
            )
        } else {
            (chars * TEXT_LENGTH_WEIGHT, words * WORD_COUNT_WEIGHT)
        };

        let bonus = match title {
            Some(t) if !t.trim().is_empty() => TITLE_BONUS,
            _ => 0.0,
        };

        length_score + word_score + bonus
    }
}
