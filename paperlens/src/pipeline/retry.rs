//! Retry with exponential backoff for stage-side service calls.
//!
//! The runner never retries; stages wrap each generation request in
//! [`with_backoff`]. Only rate-limit and unavailable classes are retried,
//! and cancellation short-circuits an in-progress wait.

use crate::cancellation::CancellationToken;
use crate::errors::GenerateError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Backoff configuration for calls to the generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: usize,
    /// Base delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Cap on the computed delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Upper bound of the uniform jitter added to each delay, in milliseconds.
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 3000,
            max_delay_ms: 30_000,
            jitter_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total attempt count.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Sets the jitter bound. Zero disables jitter.
    #[must_use]
    pub fn with_jitter_ms(mut self, jitter: u64) -> Self {
        self.jitter_ms = jitter;
        self
    }

    /// Computes the delay before the retry following `attempt` (0-indexed).
    #[must_use]
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt as u32))
            .min(self.max_delay_ms);

        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        };

        Duration::from_millis(exponential.saturating_add(jitter))
    }
}

/// Runs `operation` with bounded exponential backoff.
///
/// Retries only failures whose [`GenerateError::is_retryable`] is true.
/// Cancellation is checked before every attempt and races every backoff
/// sleep, yielding [`GenerateError::Cancelled`] promptly.
///
/// # Errors
///
/// Returns the last failure once attempts are exhausted, the first
/// non-retryable failure immediately, or `Cancelled`.
pub async fn with_backoff<T, F, Fut>(
    config: &RetryConfig,
    signal: &CancellationToken,
    mut operation: F,
) -> Result<T, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerateError>>,
{
    let mut attempt = 0;

    loop {
        if signal.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(GenerateError::Cancelled) => return Err(GenerateError::Cancelled),
            Err(err) if err.is_retryable() && attempt + 1 < config.max_attempts => {
                let delay = config.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "generation service busy, backing off"
                );

                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = signal.cancelled() => return Err(GenerateError::Cancelled),
                }

                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
