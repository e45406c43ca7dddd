// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-client rate limiting for URL extraction

use axum::http::HeaderMap;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::errors::ApiError;

const ANONYMOUS_CLIENT: &str = "anonymous";

type KeyedLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Rate limiter keyed by client address
pub struct ClientRateLimiter {
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
    requests_per_minute: u32,
}

impl ClientRateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `requests_per_minute` - Maximum requests per client per minute
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(GovRateLimiter::keyed(Quota::per_minute(rpm)));

        Self {
            limiter,
            clock: DefaultClock::default(),
            requests_per_minute: rpm.get(),
        }
    }

    /// Check whether `client` may make another request
    pub fn check(&self, client: &str) -> Result<(), ApiError> {
        match self.limiter.check_key(&client.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                Err(ApiError::RateLimitExceeded {
                    retry_after: wait.as_secs().max(1),
                })
            }
        }
    }

    /// Drop state for clients that are back to a full quota
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}

/// Client key: first `x-forwarded-for` entry, else `x-real-ip`, else "anonymous"
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}
