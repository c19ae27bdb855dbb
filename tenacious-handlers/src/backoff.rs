//! Exponential backoff.

use crate::config::ExponentialBackoffOptions;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tenacious_core::{Abort, Handler, HandlerResult, RetryState};
use tokio::time::sleep;
use tracing::debug;

/// Handler waiting exponentially longer after each failure.
///
/// The delay after attempt `n` is
/// `min(initial_delay * time_multiple^(n - 1), max_delay)`, optionally
/// scaled by a random factor in `[0, 1)`. Once `max_attempts` attempts have
/// failed the handler aborts with the current error instead of waiting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExponentialBackoff {
    options: ExponentialBackoffOptions,
}

impl ExponentialBackoff {
    /// Create a backoff from options.
    #[must_use]
    pub fn new(options: ExponentialBackoffOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ExponentialBackoffOptions {
        &self.options
    }

    /// Delay before the retry following failed attempt `attempt`, ignoring jitter.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let ExponentialBackoffOptions {
            initial_delay,
            max_delay,
            time_multiple,
            ..
        } = self.options;

        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        // `f64::max` maps NaN to zero.
        let secs = (initial_delay.as_secs_f64() * time_multiple.powi(exponent)).max(0.0);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);

        match max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    fn next_delay(&self, attempt: u32) -> Duration {
        let delay = self.calculate_delay(attempt);
        if self.options.jitter {
            let factor = rand::thread_rng().gen::<f64>();
            Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
        } else {
            delay
        }
    }
}

#[async_trait]
impl<E: Send> Handler<E> for ExponentialBackoff {
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        let attempt = state.attempts();
        if attempt >= self.options.max_attempts {
            return Err(Abort::Rethrow);
        }

        let wait = self.next_delay(attempt);
        debug!(
            attempt,
            wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            "Backing off before retry"
        );
        sleep(wait).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "exponential_backoff"
    }
}

/// Back off exponentially between attempts.
///
/// ```ignore
/// use tenacious_handlers::{exponential_backoff, ExponentialBackoffOptions};
/// use std::time::Duration;
///
/// let backoff = exponential_backoff(
///     ExponentialBackoffOptions::new()
///         .with_max_delay(Duration::from_secs(5))
///         .with_jitter(true),
/// );
/// ```
pub fn exponential_backoff(options: ExponentialBackoffOptions) -> ExponentialBackoff {
    ExponentialBackoff::new(options)
}
