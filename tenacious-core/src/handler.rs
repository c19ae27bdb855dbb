//! The handler protocol.
//!
//! A handler is consulted after every failed attempt. Returning `Ok(())`
//! permits another attempt; returning an [`Abort`] ends the whole retry
//! sequence. Handlers run strictly in order and each one is fully awaited
//! before the next starts.

use crate::state::RetryState;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Result returned by a [`Handler`].
pub type HandlerResult<E> = Result<(), Abort<E>>;

/// A handler shared between chains and policies.
pub type BoxedHandler<E> = Arc<dyn Handler<E>>;

/// Collector turning the full error history into the terminal error.
pub type ErrorCollector<E> = Box<dyn FnOnce(Vec<E>) -> E + Send>;

/// Why a handler stopped the retry sequence, and with what value.
pub enum Abort<E> {
    /// Fail with the current error of the retry state.
    Rethrow,
    /// Fail with a different value.
    Raise(E),
    /// Fail with a value built from every error seen so far.
    Collect(ErrorCollector<E>),
}

impl<E> Abort<E> {
    /// Abort with the current error.
    pub fn rethrow() -> Self {
        Self::Rethrow
    }

    /// Abort with the given error.
    pub fn raise(error: E) -> Self {
        Self::Raise(error)
    }

    /// Abort with an error built from the whole error history.
    pub fn collect(f: impl FnOnce(Vec<E>) -> E + Send + 'static) -> Self {
        Self::Collect(Box::new(f))
    }

    /// Resolve this abort into the error handed back to the caller.
    pub fn resolve(self, state: RetryState<E>) -> E {
        match self {
            Self::Rethrow => state.into_error(),
            Self::Raise(error) => error,
            Self::Collect(collect) => collect(state.into_errors()),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Abort<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rethrow => f.write_str("Rethrow"),
            Self::Raise(error) => f.debug_tuple("Raise").field(error).finish(),
            Self::Collect(_) => f.write_str("Collect(..)"),
        }
    }
}

/// Decides, after a failed attempt, whether the sequence may continue.
///
/// Built-in handlers and user code implement this trait the same way.
/// A handler may rewrite the current error through the state before
/// returning; later handlers and the final failure see the rewritten value.
#[async_trait]
pub trait Handler<E>: Send + Sync {
    /// Inspect the failed attempt.
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E>;

    /// Name used in log output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<E, H> Handler<E> for Arc<H>
where
    E: Send,
    H: Handler<E> + ?Sized,
{
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        (**self).handle(state).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Share a handler so it can sit in several chains.
pub fn boxed<E, H>(handler: H) -> BoxedHandler<E>
where
    E: Send,
    H: Handler<E> + 'static,
{
    Arc::new(handler)
}

/// Wrapper turning a synchronous closure into a [`Handler`].
#[derive(Clone)]
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Wrap a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<E, F> Handler<E> for FnHandler<F>
where
    E: Send,
    F: Fn(&mut RetryState<E>) -> HandlerResult<E> + Send + Sync,
{
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        (self.func)(state)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Build a handler from a synchronous closure.
///
/// ```ignore
/// use tenacious_core::{from_fn, Abort, RetryState};
///
/// let log_and_continue = from_fn(|state: &mut RetryState<std::io::Error>| {
///     eprintln!("attempt {} failed: {}", state.attempts(), state.error());
///     Ok(())
/// });
/// ```
pub fn from_fn<E, F>(func: F) -> FnHandler<F>
where
    E: Send,
    F: Fn(&mut RetryState<E>) -> HandlerResult<E> + Send + Sync,
{
    FnHandler::new(func)
}

/// Build a `Vec<BoxedHandler<E>>` from handlers of different types.
///
/// ```ignore
/// use tenacious::prelude::*;
///
/// let chain = handlers![tries(5), delay_ms(10)];
/// ```
#[macro_export]
macro_rules! handlers {
    () => {
        ::std::vec::Vec::new()
    };
    ($($handler:expr),+ $(,)?) => {
        ::std::vec![$($crate::boxed($handler)),+]
    };
}
