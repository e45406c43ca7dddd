// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/mod.rs - Metrics and health reporting

pub mod health;
pub mod metrics;

pub use health::{HealthReport, HealthStatus};
pub use metrics::{CacheOperation, InFlightGuard, ServiceMetrics};
