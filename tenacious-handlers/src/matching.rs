//! Filtering handlers that only let selected errors through.
//!
//! These handlers abort with the current error unchanged when it is not one
//! the caller expects to be transient. Place them first in a chain so that
//! an unexpected error aborts before any delay is paid.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tenacious_core::{Abort, Handler, HandlerResult, RetrySignalExt, RetryState};

type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A test applied to an error by [`if_error_matches`].
pub struct Matcher<E> {
    predicate: Predicate<E>,
    label: String,
}

impl<E> Matcher<E> {
    /// Match errors for which `predicate` returns `true`.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            label: "predicate".to_string(),
        }
    }

    /// Check an error against this matcher.
    pub fn matches(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

#[cfg(feature = "pattern")]
impl<E: serde::Serialize> Matcher<E> {
    /// Match errors whose serialized form contains `pattern`.
    ///
    /// See [`shape::is_match`](crate::shape::is_match) for the rules.
    pub fn shape(pattern: serde_json::Value) -> Self {
        let label = pattern.to_string();
        Self {
            predicate: Arc::new(move |error: &E| crate::shape::matches_shape(error, &pattern)),
            label,
        }
    }
}

impl<E> Clone for Matcher<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            label: self.label.clone(),
        }
    }
}

impl<E> fmt::Debug for Matcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matcher").field(&self.label).finish()
    }
}

/// Handler retrying only errors accepted by at least one matcher.
pub struct ErrorMatches<E> {
    matchers: Vec<Matcher<E>>,
}

impl<E> ErrorMatches<E> {
    /// The matchers consulted, in order.
    pub fn matchers(&self) -> &[Matcher<E>] {
        &self.matchers
    }
}

impl<E> Clone for ErrorMatches<E> {
    fn clone(&self) -> Self {
        Self {
            matchers: self.matchers.clone(),
        }
    }
}

impl<E> fmt::Debug for ErrorMatches<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMatches")
            .field("matchers", &self.matchers)
            .finish()
    }
}

#[async_trait]
impl<E: Send> Handler<E> for ErrorMatches<E> {
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        if self.matchers.iter().any(|m| m.matches(state.error())) {
            Ok(())
        } else {
            Err(Abort::Rethrow)
        }
    }

    fn name(&self) -> &'static str {
        "if_error_matches"
    }
}

/// Retry only errors matching at least one of `matchers`.
///
/// With no matchers every error aborts.
///
/// ```ignore
/// use serde_json::json;
/// use tenacious_handlers::{if_error_matches, Matcher};
///
/// let on_scaling = if_error_matches([
///     Matcher::shape(json!({"code": "DB_INSUFFICIENT_SCALE"})),
///     Matcher::when(|e: &DbError| e.is_timeout()),
/// ]);
/// ```
pub fn if_error_matches<E>(matchers: impl IntoIterator<Item = Matcher<E>>) -> ErrorMatches<E> {
    ErrorMatches {
        matchers: matchers.into_iter().collect(),
    }
}

/// Handler retrying while a synchronous predicate holds.
#[derive(Clone)]
pub struct IfTrue<P> {
    predicate: P,
}

impl<P> fmt::Debug for IfTrue<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IfTrue").finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, P> Handler<E> for IfTrue<P>
where
    E: Send,
    P: Fn(&E, &RetryState<E>) -> bool + Send + Sync,
{
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        if (self.predicate)(state.error(), state) {
            Ok(())
        } else {
            Err(Abort::Rethrow)
        }
    }

    fn name(&self) -> &'static str {
        "if_true"
    }
}

/// Retry only while `predicate(error, state)` returns `true`.
pub fn if_true<E, P>(predicate: P) -> IfTrue<P>
where
    E: Send,
    P: Fn(&E, &RetryState<E>) -> bool + Send + Sync,
{
    IfTrue { predicate }
}

/// Handler retrying while an asynchronous predicate holds.
pub struct IfTrueAsync<P, Fut> {
    predicate: P,
    _future: PhantomData<fn() -> Fut>,
}

impl<P: Clone, Fut> Clone for IfTrueAsync<P, Fut> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            _future: PhantomData,
        }
    }
}

impl<P, Fut> fmt::Debug for IfTrueAsync<P, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IfTrueAsync").finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, P, Fut> Handler<E> for IfTrueAsync<P, Fut>
where
    E: Send,
    P: Fn(&E, &RetryState<E>) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        if (self.predicate)(state.error(), state).await {
            Ok(())
        } else {
            Err(Abort::Rethrow)
        }
    }

    fn name(&self) -> &'static str {
        "if_true_async"
    }
}

/// Retry only while the future returned by `predicate(error, state)`
/// resolves to `true`.
///
/// The returned future cannot borrow the error or the state; copy out what
/// it needs before the `async` block.
///
/// ```ignore
/// let while_healthy = if_true_async(|err: &ApiError, _state| {
///     let region = err.region.clone();
///     async move { health.is_up(&region).await }
/// });
/// ```
pub fn if_true_async<E, P, Fut>(predicate: P) -> IfTrueAsync<P, Fut>
where
    E: Send,
    P: Fn(&E, &RetryState<E>) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    IfTrueAsync {
        predicate,
        _future: PhantomData,
    }
}

/// Handler retrying only the [`RETRY`](tenacious_core::RETRY) sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Explicitly;

#[async_trait]
impl<E> Handler<E> for Explicitly
where
    E: RetrySignalExt + Send,
{
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        if state.error().is_retry_signal() {
            Ok(())
        } else {
            Err(Abort::Rethrow)
        }
    }

    fn name(&self) -> &'static str {
        "explicitly"
    }
}

/// Retry only when the action failed with the `RETRY` sentinel; any other
/// error aborts unchanged.
pub fn explicitly() -> Explicitly {
    Explicitly
}
