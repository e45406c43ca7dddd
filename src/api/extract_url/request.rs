// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL extract API request types

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Request body for POST /extract/url
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractUrlRequest {
    /// Page to fetch (required)
    #[serde(default)]
    pub url: Option<String>,
}

impl ExtractUrlRequest {
    /// Validate the request, returning the trimmed URL string
    ///
    /// Scheme and port rules are applied afterwards by the fetch layer.
    pub fn validate(&self) -> Result<&str, ApiError> {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ApiError::InvalidRequest("URL cannot be empty".to_string())),
        }
    }
}
