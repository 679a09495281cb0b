//! Backoff-retry wrapper around a single transport operation.
//!
//! Ordinary failures end up as `Ok(false)`; cancellation is the only thing
//! that leaves as `Err`.

use crate::constants::{DEFAULT_MAX_RETRY_ATTEMPTS, MAX_BACKOFF_JITTER_MS};
use crate::transport::TransportError;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// The caller's cancellation token fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;
type TransiencePredicate = Arc<dyn Fn(&TransportError) -> bool + Send + Sync>;

/// Attempt ceiling, wait schedule and retryability test.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffFn,
    is_transient: TransiencePredicate,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRY_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Exponential backoff with jitter; every non-cancellation error is transient.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(exponential_backoff),
            is_transient: Arc::new(|err: &TransportError| !err.is_cancellation()),
        }
    }

    pub fn with_backoff(
        mut self,
        backoff: impl Fn(u32) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    pub fn with_transience(
        mut self,
        is_transient: impl Fn(&TransportError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_transient = Arc::new(is_transient);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_for(
        &self,
        attempt: u32,
    ) -> Duration {
        (self.backoff)(attempt)
    }

    pub fn is_transient(
        &self,
        err: &TransportError,
    ) -> bool {
        !err.is_cancellation() && (self.is_transient)(err)
    }
}

/// `2^attempt` seconds plus up to a second of random jitter.
pub fn exponential_backoff(attempt: u32) -> Duration {
    let base = Duration::from_secs(2u64.saturating_pow(attempt));
    let jitter = rand::rng().random_range(0..=MAX_BACKOFF_JITTER_MS);
    base.saturating_add(Duration::from_millis(jitter))
}

/// Run `action` until it succeeds, fails permanently, or runs out of attempts.
///
/// Returns `Ok(true)` on success and `Ok(false)` once retries are exhausted
/// or the error is not transient. Cancellation, whether reported by the
/// action or observed during a backoff wait, returns `Err(Cancelled)`
/// without further attempts.
pub async fn execute_with_retry<F, Fut>(
    operation: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut action: F,
) -> Result<bool, Cancelled>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), TransportError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        debug!(operation, attempt, "attempting");
        let err = match action().await {
            Ok(()) => {
                debug!(operation, attempt, "succeeded");
                return Ok(true);
            }
            Err(err) => err,
        };
        if err.is_cancellation() {
            debug!(operation, attempt, "cancelled by transport");
            return Err(Cancelled);
        }
        if !policy.is_transient(&err) {
            error!(operation, attempt, error = %err, "permanent failure, not retrying");
            return Ok(false);
        }
        if attempt >= policy.max_attempts() {
            error!(operation, attempts = attempt, error = %err, "giving up after retries");
            return Ok(false);
        }
        let wait = policy.backoff_for(attempt);
        warn!(
            operation,
            attempt,
            ?wait,
            error = %err,
            "attempt failed, will retry"
        );
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(operation, attempt, "cancelled during backoff");
                return Err(Cancelled);
            }
            _ = tokio::time::sleep(wait) => {}
        }
    }
}
