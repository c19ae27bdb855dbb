//! Handlers that cap how long, or how often, a sequence may retry.

use async_trait::async_trait;
use std::time::Duration;
use tenacious_core::{Abort, Handler, HandlerResult, RetryState};

/// Handler that stops retrying once a total time has elapsed.
///
/// Elapsed time is measured from the start of the first attempt and only
/// checked after an attempt has failed; an attempt already running is never
/// interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    /// Total time after which no further attempt is started.
    pub limit: Duration,
}

impl Deadline {
    /// Create a new deadline.
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// Whether `elapsed` is past the deadline.
    pub fn is_exceeded(&self, elapsed: Duration) -> bool {
        elapsed > self.limit
    }
}

#[async_trait]
impl<E: Send> Handler<E> for Deadline {
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        if self.is_exceeded(state.elapsed()) {
            Err(Abort::Rethrow)
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "deadline"
    }
}

/// Stop retrying once `limit` has elapsed since the first attempt started.
pub fn deadline(limit: Duration) -> Deadline {
    Deadline::new(limit)
}

/// Stop retrying once `millis` milliseconds have elapsed.
pub fn deadline_ms(millis: u64) -> Deadline {
    Deadline::new(Duration::from_millis(millis))
}

/// Stop retrying once `seconds` seconds have elapsed.
pub fn deadline_sec(seconds: f64) -> Deadline {
    Deadline::new(crate::secs(seconds))
}

/// Handler limiting the total number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tries {
    /// Maximum attempts, including the first one.
    pub max_tries: u32,
}

impl Tries {
    /// Create a new attempt limit.
    #[must_use]
    pub fn new(max_tries: u32) -> Self {
        Self { max_tries }
    }

    /// Whether the attempt that just failed was the last one allowed.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_tries
    }
}

#[async_trait]
impl<E: Send> Handler<E> for Tries {
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        if self.is_exhausted(state.attempts()) {
            Err(Abort::Rethrow)
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "tries"
    }
}

/// Allow at most `max_tries` attempts in total.
///
/// `tries(1)` runs the action once and never retries.
pub fn tries(max_tries: u32) -> Tries {
    Tries::new(max_tries)
}
