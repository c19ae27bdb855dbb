//! Fixed delay between attempts.

use async_trait::async_trait;
use std::time::Duration;
use tenacious_core::{Handler, HandlerResult, RetryState};
use tokio::time::sleep;
use tracing::debug;

/// Handler that always permits a retry after sleeping a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    /// Time to wait before the next attempt.
    pub delay: Duration,
}

impl FixedDelay {
    /// Create a new fixed delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl<E: Send> Handler<E> for FixedDelay {
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        debug!(
            attempt = state.attempts(),
            wait_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
            "Waiting before retry"
        );
        sleep(self.delay).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "delay"
    }
}

/// Wait `delay` before every retry.
pub fn delay(delay: Duration) -> FixedDelay {
    FixedDelay::new(delay)
}

/// Wait `millis` milliseconds before every retry.
pub fn delay_ms(millis: u64) -> FixedDelay {
    FixedDelay::new(Duration::from_millis(millis))
}

/// Wait `seconds` seconds before every retry.
pub fn delay_sec(seconds: f64) -> FixedDelay {
    FixedDelay::new(crate::secs(seconds))
}
