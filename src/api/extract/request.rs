// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extract API request types

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::errors::ApiError;

/// Request body for POST /extract
///
/// Both fields are optional at the serde level so a missing field is
/// reported as a validation error naming it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Raw HTML document (required, non-blank)
    #[serde(default)]
    pub html: Option<String>,

    /// Source URL of the document (required, absolute http/https)
    #[serde(default)]
    pub url: Option<String>,
}

impl ExtractRequest {
    /// Validate the request, returning the HTML and parsed URL
    pub fn validate(self, max_html_bytes: usize) -> Result<(String, Url), ApiError> {
        let html = match self.html {
            Some(html) if !html.trim().is_empty() => html,
            _ => return Err(ApiError::validation("html", "HTML content cannot be empty")),
        };
        if html.len() > max_html_bytes {
            return Err(ApiError::validation(
                "html",
                format!("HTML content exceeds {} bytes", max_html_bytes),
            ));
        }

        let raw_url = match self.url {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(ApiError::validation("url", "URL cannot be empty")),
        };
        let url = Url::parse(raw_url.trim())
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .ok_or_else(|| {
                ApiError::validation("url", "URL must be an absolute http or https URL")
            })?;

        Ok((html, url))
    }
}
