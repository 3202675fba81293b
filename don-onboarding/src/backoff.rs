// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Bounded retries with Fibonacci-spaced delays.

use humantime::format_duration;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Delays `base, 2*base, 3*base, 5*base, 8*base, ...`
#[derive(Debug, Clone)]
pub(crate) struct FibonacciBackoff {
    prev: Duration,
    curr: Duration,
}

impl FibonacciBackoff {
    pub(crate) fn new(base: Duration) -> Self {
        FibonacciBackoff {
            prev: Duration::ZERO,
            curr: base,
        }
    }
}

impl Iterator for FibonacciBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.prev.saturating_add(self.curr);
        self.prev = self.curr;
        self.curr = delay;
        Some(delay)
    }
}

/// Why a retried operation gave up
#[derive(Debug)]
pub(crate) enum RetryError<E> {
    /// every try failed, holds the last error
    Exhausted(E),
    /// the stop token fired between two tries
    Cancelled,
}

/// Run `op` once, then retry it up to `max_retries` times while it fails,
/// sleeping along a Fibonacci backoff between tries.
///
/// Cancellation is only observed between tries: a running `op` is never
/// interrupted.
pub(crate) async fn retry_with_backoff<T, E, F, Fut>(
    base: Duration,
    max_retries: u32,
    stop: &CancellationToken,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delays = FibonacciBackoff::new(base);
    let mut retries = 0;
    loop {
        if stop.is_cancelled() {
            return Err(RetryError::Cancelled);
        }
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries >= max_retries {
            return Err(RetryError::Exhausted(err));
        }
        retries += 1;
        let delay = delays.next().unwrap_or(base);
        debug!(
            "try {} failed ({}), retrying in {}",
            retries,
            err,
            format_duration(delay)
        );
        tokio::select! {
            _ = stop.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
