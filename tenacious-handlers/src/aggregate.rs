//! Turning a give-up into an error carrying the whole history.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tenacious_core::{Abort, Handler, HandlerResult, RetryState};

/// Handler wrapping another one so that its plain rethrow becomes an error
/// built from every attempt's error.
///
/// Aborts that already carry their own value pass through untouched.
pub struct Aggregate<H, F> {
    inner: H,
    collect: Arc<F>,
}

impl<H: Clone, F> Clone for Aggregate<H, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            collect: Arc::clone(&self.collect),
        }
    }
}

impl<H: fmt::Debug, F> fmt::Debug for Aggregate<H, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, H, F> Handler<E> for Aggregate<H, F>
where
    E: Send + 'static,
    H: Handler<E>,
    F: Fn(Vec<E>) -> E + Send + Sync + 'static,
{
    async fn handle(&self, state: &mut RetryState<E>) -> HandlerResult<E> {
        match self.inner.handle(state).await {
            Err(Abort::Rethrow) => {
                let collect = Arc::clone(&self.collect);
                Err(Abort::collect(move |errors| collect(errors)))
            }
            other => other,
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Wrap `inner` so that when it gives up, the sequence fails with
/// `collect(all errors)` instead of just the last error.
///
/// ```ignore
/// let give_up = aggregate(tries(3), |errors| AppError::Exhausted(Exhausted::new(errors)));
/// ```
pub fn aggregate<E, H, F>(inner: H, collect: F) -> Aggregate<H, F>
where
    E: Send + 'static,
    H: Handler<E>,
    F: Fn(Vec<E>) -> E + Send + Sync + 'static,
{
    Aggregate {
        inner,
        collect: Arc::new(collect),
    }
}
