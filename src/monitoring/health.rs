// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health reporting

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn from_available(available: bool) -> Self {
        if available {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub extractor_available: bool,
    pub version: String,
    /// Build tag, e.g. `v0.1.0-readability-extract-...`
    pub build: String,
    pub features: Vec<String>,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl HealthReport {
    pub fn new(extractor_available: bool) -> Self {
        Self {
            status: HealthStatus::from_available(extractor_available),
            extractor_available,
            version: version::VERSION_NUMBER.to_string(),
            build: version::VERSION.to_string(),
            features: version::FEATURES.iter().map(|f| f.to_string()).collect(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
