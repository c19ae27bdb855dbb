//! Retry executor driving the attempt loop.

use crate::handler::BoxedHandler;
use crate::state::RetryState;
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Run `action` until it succeeds or a handler aborts.
///
/// After every failure the handlers run in order against the shared
/// [`RetryState`]. If all of them return `Ok(())` the action is invoked
/// again; the first handler returning an [`Abort`](crate::Abort) ends the
/// sequence with the error it resolves to. The action is always invoked at
/// least once, and with no handlers it is retried until it succeeds.
///
/// # Example
///
/// ```ignore
/// use tenacious_core::{handlers, retry};
/// use tenacious_handlers::{delay_ms, tries};
///
/// let row = retry(|| db.get_row(42), &handlers![tries(5), delay_ms(100)]).await?;
/// ```
pub async fn retry<F, Fut, T, E>(mut action: F, handlers: &[BoxedHandler<E>]) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Send,
{
    let start_time = Instant::now();
    let mut previous: Option<RetryState<E>> = None;

    loop {
        let error = match action().await {
            Ok(value) => {
                if let Some(state) = &previous {
                    debug!(
                        attempts = state.attempts().saturating_add(1),
                        "Operation succeeded after retrying"
                    );
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        let mut state = match previous.take() {
            Some(state) => state.next_attempt(error),
            None => RetryState::new(start_time, error),
        };

        debug!(
            attempt = state.attempts(),
            handlers = handlers.len(),
            "Attempt failed, consulting handlers"
        );

        for handler in handlers {
            if let Err(abort) = handler.handle(&mut state).await {
                warn!(
                    attempt = state.attempts(),
                    handler = handler.name(),
                    "Handler aborted retry sequence"
                );
                return Err(abort.resolve(state));
            }
            trace!(handler = handler.name(), "Handler permitted another attempt");
        }

        previous = Some(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{boxed, from_fn, Abort, Handler, HandlerResult};
    use crate::handlers;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct TestError(u32);

    type Attempt = std::future::Ready<Result<&'static str, TestError>>;

    /// Action failing with `TestError(n)` on its first `failures` calls.
    fn failing_until(failures: u32, calls: Arc<AtomicU32>) -> impl FnMut() -> Attempt {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n > failures {
                std::future::ready(Ok("done"))
            } else {
                std::future::ready(Err(TestError(n)))
            }
        }
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Handler<TestError> for Recorder {
        async fn handle(&self, state: &mut RetryState<TestError>) -> HandlerResult<TestError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, state.attempts()));
            tokio::task::yield_now().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_immediate_success_skips_handlers() {
        let called = Arc::new(AtomicU32::new(0));
        let called_clone = called.clone();
        let chain = handlers![from_fn(move |_state: &mut RetryState<TestError>| {
            called_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })];

        let result = retry(|| async { Ok::<_, TestError>(42) }, &chain).await;

        assert_eq!(result, Ok(42));
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retries_forever_without_handlers() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry(failing_until(2, calls.clone()), &[]).await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_handlers_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = handlers![
            Recorder { label: "h1", log: log.clone() },
            Recorder { label: "h2", log: log.clone() },
        ];
        let calls = Arc::new(AtomicU32::new(0));

        retry(failing_until(2, calls), &chain).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["h1:1", "h2:1", "h1:2", "h2:2"]
        );
    }

    #[tokio::test]
    async fn test_abort_stops_chain_and_attempts() {
        let later = Arc::new(AtomicU32::new(0));
        let later_clone = later.clone();
        let chain = handlers![
            from_fn(|_state: &mut RetryState<TestError>| Err(Abort::rethrow())),
            from_fn(move |_state: &mut RetryState<TestError>| {
                later_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ];
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry(failing_until(10, calls.clone()), &chain).await;

        assert_eq!(result, Err(TestError(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rewritten_error_is_seen_downstream_and_returned() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let chain = handlers![
            from_fn(|state: &mut RetryState<TestError>| {
                state.map_error(|TestError(n)| TestError(n * 100));
                Ok(())
            }),
            from_fn(move |state: &mut RetryState<TestError>| {
                seen_clone.lock().unwrap().push(state.errors().to_vec());
                if state.attempts() >= 2 {
                    Err(Abort::rethrow())
                } else {
                    Ok(())
                }
            }),
        ];
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry(failing_until(10, calls), &chain).await;

        assert_eq!(result, Err(TestError(200)));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                vec![TestError(100)],
                vec![TestError(100), TestError(200)],
            ]
        );
    }

    #[tokio::test]
    async fn test_raise_replaces_terminal_error() {
        let chain = handlers![from_fn(|_state: &mut RetryState<TestError>| {
            Err(Abort::raise(TestError(999)))
        })];
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry(failing_until(10, calls), &chain).await;
        assert_eq!(result, Err(TestError(999)));
    }

    #[tokio::test]
    async fn test_collect_sees_full_history() {
        let chain = handlers![from_fn(|state: &mut RetryState<TestError>| {
            if state.attempts() == 3 {
                Err(Abort::collect(|errors: Vec<TestError>| {
                    TestError(errors.iter().map(|e| e.0).sum())
                }))
            } else {
                Ok(())
            }
        })];
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry(failing_until(10, calls), &chain).await;
        assert_eq!(result, Err(TestError(1 + 2 + 3)));
    }

    #[tokio::test]
    async fn test_state_is_fresh_per_call() {
        let handler = boxed(from_fn(|state: &mut RetryState<TestError>| {
            if state.attempts() >= 2 {
                Err(Abort::rethrow())
            } else {
                Ok(())
            }
        }));
        let chain = vec![handler];

        for _ in 0..2 {
            let calls = Arc::new(AtomicU32::new(0));
            let result = retry(failing_until(10, calls.clone()), &chain).await;
            assert_eq!(result, Err(TestError(2)));
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }
    }
}
