//! State threaded through one retry sequence.

use std::time::Duration;
use tokio::time::Instant;

/// Record of a single logical retry sequence.
///
/// A fresh state is created by [`retry`](crate::retry) on the first failed
/// attempt and handed to every handler by mutable reference. The current
/// error is always the last entry of the error history, so replacing it
/// through [`replace_error`](Self::replace_error) or
/// [`error_mut`](Self::error_mut) also rewrites that attempt's history slot.
#[derive(Debug, Clone)]
pub struct RetryState<E> {
    attempts: u32,
    start_time: Instant,
    errors: Vec<E>,
}

impl<E> RetryState<E> {
    /// Create the state for the first failed attempt.
    ///
    /// `start_time` is the instant the first attempt began.
    pub fn new(start_time: Instant, error: E) -> Self {
        Self {
            attempts: 1,
            start_time,
            errors: vec![error],
        }
    }

    /// Advance to the next failed attempt, recording its error.
    #[must_use]
    pub fn next_attempt(mut self, error: E) -> Self {
        self.attempts = self.attempts.saturating_add(1);
        self.errors.push(error);
        self
    }

    /// Number of the attempt that just failed (1-indexed).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// When the first attempt started.
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Time spent since the first attempt started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// The most recent error, as seen by the next handler.
    pub fn error(&self) -> &E {
        // `errors` is never empty: it is seeded in `new` and only ever grows.
        &self.errors[self.errors.len() - 1]
    }

    /// Mutable access to the most recent error.
    pub fn error_mut(&mut self) -> &mut E {
        let last = self.errors.len() - 1;
        &mut self.errors[last]
    }

    /// Replace the most recent error, returning the previous value.
    pub fn replace_error(&mut self, error: E) -> E {
        std::mem::replace(self.error_mut(), error)
    }

    /// Transform the most recent error in place.
    pub fn map_error(&mut self, f: impl FnOnce(E) -> E) {
        if let Some(error) = self.errors.pop() {
            self.errors.push(f(error));
        }
    }

    /// Every error seen so far, oldest first.
    ///
    /// Entry `i` holds the error of attempt `i + 1` as left by the handler chain.
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Consume the state, yielding the current error.
    pub fn into_error(mut self) -> E {
        // Same invariant as `error`.
        match self.errors.pop() {
            Some(error) => error,
            None => unreachable!("retry state always holds at least one error"),
        }
    }

    /// Consume the state, yielding the whole error history.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }
}
