//! The explicit retry sentinel.

use thiserror::Error;

/// Marker value meaning "this failure should simply be retried".
///
/// The type cannot be constructed outside this crate; [`RETRY`] is its only
/// value, so recognising the type is the same as recognising the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("retry requested")]
pub struct RetrySignal {
    _private: (),
}

/// The process-wide retry sentinel.
///
/// Fail an action with this value (or an error wrapping it) and pair it with
/// the `explicitly` handler to request a retry without relying on error
/// shapes.
pub const RETRY: RetrySignal = RetrySignal { _private: () };

/// Errors that can carry the [`RETRY`] sentinel.
pub trait RetrySignalExt {
    /// Whether this value is the retry sentinel.
    fn is_retry_signal(&self) -> bool;
}

impl RetrySignalExt for RetrySignal {
    fn is_retry_signal(&self) -> bool {
        true
    }
}

impl RetrySignalExt for anyhow::Error {
    fn is_retry_signal(&self) -> bool {
        self.downcast_ref::<RetrySignal>().is_some()
    }
}

impl RetrySignalExt for Box<dyn std::error::Error + Send + Sync> {
    fn is_retry_signal(&self) -> bool {
        self.downcast_ref::<RetrySignal>().is_some()
    }
}

impl<T: RetrySignalExt> RetrySignalExt for Option<T> {
    fn is_retry_signal(&self) -> bool {
        self.as_ref().is_some_and(RetrySignalExt::is_retry_signal)
    }
}
