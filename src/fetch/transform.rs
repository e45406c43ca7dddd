// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL normalisation before fetching
//!
//! Rewrites variants of a page (AMP, mobile host, print view) to the
//! canonical article URL. The normalised URL is also the cache key.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// Query parameters that only select a print or plain-text view
const PRINT_PARAMS: &[&str] = &["print", "plain"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTransformation {
    Amp,
    Mobile,
    Print,
}

impl UrlTransformation {
    /// Label used in metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlTransformation::Amp => "amp",
            UrlTransformation::Mobile => "mobile",
            UrlTransformation::Print => "print",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUrl {
    pub url: Url,
    /// Applied transformations, in order
    pub transformations: Vec<UrlTransformation>,
}

pub fn normalize_url(mut url: Url) -> NormalizedUrl {
    let mut transformations = Vec::new();

    if strip_amp(&mut url) {
        transformations.push(UrlTransformation::Amp);
    }
    if rewrite_mobile_host(&mut url) {
        transformations.push(UrlTransformation::Mobile);
    }
    if strip_print_params(&mut url) {
        transformations.push(UrlTransformation::Print);
    }

    NormalizedUrl {
        url,
        transformations,
    }
}

fn amp_segment() -> Option<&'static Regex> {
    static AMP: OnceLock<Option<Regex>> = OnceLock::new();
    AMP.get_or_init(|| Regex::new(r"/amp(/|$)").ok()).as_ref()
}

/// `/news/amp/story` -> `/news/story`, `/news/amp` -> `/news`
fn strip_amp(url: &mut Url) -> bool {
    let path = url.path();
    if !(path.contains("/amp/") || path.ends_with("/amp")) {
        return false;
    }

    let stripped = match amp_segment() {
        Some(regex) => regex.replacen(path, 1, "$1").into_owned(),
        None => return false,
    };
    let stripped = if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped
    };
    url.set_path(&stripped);
    true
}

/// `mobile.example.com` -> `www.example.com`
fn rewrite_mobile_host(url: &mut Url) -> bool {
    let rewritten = match url.host_str().and_then(|h| h.strip_prefix("mobile.")) {
        Some(rest) if !rest.is_empty() => format!("www.{}", rest),
        _ => return false,
    };
    url.set_host(Some(&rewritten)).is_ok()
}

fn strip_print_params(url: &mut Url) -> bool {
    if url.query().is_none() {
        return false;
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let kept: Vec<&(String, String)> = pairs
        .iter()
        .filter(|(k, _)| !PRINT_PARAMS.contains(&k.as_str()))
        .collect();

    if kept.len() == pairs.len() {
        return false;
    }

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    true
}
