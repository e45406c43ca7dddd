// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Concurrency gate for blocking extraction work
//!
//! At most `max_concurrency` extractions run at once. A request that cannot
//! get a slot within the queue timeout is rejected with 503. The permit
//! moves into the blocking task, so a slot is only freed when the work
//! really ends, even if the HTTP request already timed out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::warn;

use super::errors::ApiError;
use crate::extraction::ExtractionError;
use crate::monitoring::ServiceMetrics;

#[derive(Clone)]
pub struct ExtractionGate {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
    queue_timeout: Duration,
    extraction_timeout: Duration,
    metrics: Arc<ServiceMetrics>,
}

impl ExtractionGate {
    pub fn new(
        max_concurrency: usize,
        queue_timeout: Duration,
        extraction_timeout: Duration,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            queue_timeout,
            extraction_timeout,
            metrics,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Slots currently free
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run `work` on the blocking pool once a slot is free
    pub async fn run<F, T>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = match timeout(self.queue_timeout, self.semaphore.clone().acquire_owned()).await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Err(ApiError::ServiceUnavailable(
                    "Extraction gate is closed".to_string(),
                ))
            }
            Err(_) => {
                warn!(
                    "No extraction slot free after {}ms",
                    self.queue_timeout.as_millis()
                );
                return Err(ApiError::ServiceUnavailable(
                    "Too many concurrent extractions, try again later".to_string(),
                ));
            }
        };

        let in_flight = self.metrics.in_flight();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let _in_flight = in_flight;
            work()
        });

        match timeout(self.extraction_timeout, handle).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ExtractionError::Task(e.to_string()).into()),
            Err(_) => {
                warn!(
                    "Extraction exceeded {}s, abandoning request",
                    self.extraction_timeout.as_secs()
                );
                Err(ExtractionError::Timeout {
                    timeout_secs: self.extraction_timeout.as_secs(),
                }
                .into())
            }
        }
    }
}
