//! Reusable retry policies.
//!
//! A [`Policy`] freezes two ordered handler lists, a prefix and a postfix.
//! Running it with extra "infix" handlers is the same as calling
//! [`retry`] with `prefix ++ infix ++ postfix`. Policies are immutable:
//! [`Policy::prefix`] and [`Policy::postfix`] return new policies, so a base
//! policy can serve as a template for many call sites.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tenacious_core::{retry, BoxedHandler};

/// Reusable, immutable retry behavior.
///
/// Cloning is cheap; the handler lists are shared.
pub struct Policy<E> {
    prefix: Arc<[BoxedHandler<E>]>,
    postfix: Arc<[BoxedHandler<E>]>,
}

impl<E: Send> Policy<E> {
    /// Create a policy whose handlers all sit in the prefix.
    pub fn new(handlers: impl IntoIterator<Item = BoxedHandler<E>>) -> Self {
        Self::with_postfix(handlers, Vec::new())
    }

    /// Create a policy with explicit prefix and postfix handlers.
    pub fn with_postfix(
        prefix: impl IntoIterator<Item = BoxedHandler<E>>,
        postfix: impl IntoIterator<Item = BoxedHandler<E>>,
    ) -> Self {
        Self {
            prefix: prefix.into_iter().collect(),
            postfix: postfix.into_iter().collect(),
        }
    }

    /// A new policy with `more` appended after the existing prefix handlers.
    #[must_use]
    pub fn prefix(&self, more: impl IntoIterator<Item = BoxedHandler<E>>) -> Self {
        Self {
            prefix: self.prefix.iter().cloned().chain(more).collect(),
            postfix: Arc::clone(&self.postfix),
        }
    }

    /// A new policy with `more` appended after the existing postfix handlers.
    #[must_use]
    pub fn postfix(&self, more: impl IntoIterator<Item = BoxedHandler<E>>) -> Self {
        Self {
            prefix: Arc::clone(&self.prefix),
            postfix: self.postfix.iter().cloned().chain(more).collect(),
        }
    }

    /// The full handler chain for a run with `infix` handlers.
    pub fn chain(&self, infix: impl IntoIterator<Item = BoxedHandler<E>>) -> Vec<BoxedHandler<E>> {
        self.prefix
            .iter()
            .cloned()
            .chain(infix)
            .chain(self.postfix.iter().cloned())
            .collect()
    }

    /// Number of handlers in the policy.
    pub fn len(&self) -> usize {
        self.prefix.len() + self.postfix.len()
    }

    /// Whether the policy has no handlers at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retry `action` under this policy.
    pub async fn run<F, Fut, T>(&self, action: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_with(action, Vec::new()).await
    }

    /// Retry `action` with `infix` handlers placed between prefix and postfix.
    pub async fn run_with<F, Fut, T>(
        &self,
        action: F,
        infix: impl IntoIterator<Item = BoxedHandler<E>>,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let chain = self.chain(infix);
        retry(action, &chain).await
    }
}

impl<E> Clone for Policy<E> {
    fn clone(&self) -> Self {
        Self {
            prefix: Arc::clone(&self.prefix),
            postfix: Arc::clone(&self.postfix),
        }
    }
}

impl<E: Send> Default for Policy<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<E: Send> fmt::Debug for Policy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |handlers: &[BoxedHandler<E>]| -> Vec<&'static str> {
            handlers.iter().map(|h| h.name()).collect()
        };
        f.debug_struct("Policy")
            .field("prefix", &names(&self.prefix))
            .field("postfix", &names(&self.postfix))
            .finish()
    }
}

/// Freeze `handlers` into a reusable policy.
///
/// Filtering handlers belong first and delay or backoff handlers last, so
/// that an unexpected error aborts before any time is spent waiting.
///
/// ```ignore
/// use tenacious::prelude::*;
///
/// let retry_db = create(handlers![
///     if_error_matches([Matcher::shape(json!({"code": "DB_INSUFFICIENT_SCALE"}))]),
///     deadline_sec(15.0),
///     exponential_backoff(ExponentialBackoffOptions::new().with_jitter(true)),
/// ]);
///
/// let account = retry_db.run(|| db.get_account("156")).await?;
/// ```
pub fn create<E: Send>(handlers: impl IntoIterator<Item = BoxedHandler<E>>) -> Policy<E> {
    Policy::new(handlers)
}

/// Freeze explicit prefix and postfix handler lists into a reusable policy.
pub fn create_with<E: Send>(
    prefix: impl IntoIterator<Item = BoxedHandler<E>>,
    postfix: impl IntoIterator<Item = BoxedHandler<E>>,
) -> Policy<E> {
    Policy::with_postfix(prefix, postfix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{delay_ms, tries};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tenacious_core::{from_fn, handlers, Abort, RetryState};

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn recorder(label: &'static str, log: &Log) -> BoxedHandler<u32> {
        let log = Arc::clone(log);
        tenacious_core::boxed(from_fn(move |_state: &mut RetryState<u32>| {
            log.lock().unwrap().push(label);
            Ok(())
        }))
    }

    fn stop_after_first() -> BoxedHandler<u32> {
        tenacious_core::boxed(from_fn(|_state: &mut RetryState<u32>| Err(Abort::rethrow())))
    }

    async fn always_fails() -> Result<(), u32> {
        Err(7)
    }

    #[tokio::test]
    async fn test_chain_order() {
        let log: Log = Arc::default();
        let policy = create_with(
            [recorder("pre1", &log), recorder("pre2", &log)],
            [recorder("post", &log)],
        )
        .prefix([recorder("pre3", &log)])
        .postfix([recorder("post2", &log)]);

        let result = policy
            .run_with(always_fails, [recorder("infix", &log), stop_after_first()])
            .await;

        assert_eq!(result, Err(7));
        assert_eq!(*log.lock().unwrap(), vec!["pre1", "pre2", "pre3", "infix"]);
        assert_eq!(policy.len(), 5);
    }

    #[tokio::test]
    async fn test_postfix_runs_after_infix() {
        let log: Log = Arc::default();
        let policy =
            create([recorder("pre", &log)]).postfix([recorder("post", &log), stop_after_first()]);

        let _ = policy.run_with(always_fails, [recorder("infix", &log)]).await;
        assert_eq!(*log.lock().unwrap(), vec!["pre", "infix", "post"]);
    }

    #[tokio::test]
    async fn test_extension_leaves_original_untouched() {
        let log: Log = Arc::default();
        let base = create([recorder("h1", &log), stop_after_first()]);
        let extended = base.prefix([recorder("h2", &log)]);

        let _ = base.run(always_fails).await;
        assert_eq!(*log.lock().unwrap(), vec!["h1"]);
        assert_eq!(base.len(), 2);
        assert_eq!(extended.len(), 3);
    }

    #[tokio::test]
    async fn test_postfix_leaves_original_untouched() {
        let log: Log = Arc::default();
        let base = create_with([recorder("h1", &log)], handlers![tries(2)]);
        let extended = base.postfix([recorder("post", &log)]);

        let _ = base.run(always_fails).await;
        assert_eq!(*log.lock().unwrap(), vec!["h1", "h1"]);
        assert_eq!(base.len(), 2);

        log.lock().unwrap().clear();
        let _ = extended.run(always_fails).await;
        assert_eq!(*log.lock().unwrap(), vec!["h1", "post", "h1"]);
        assert_eq!(extended.len(), 3);
    }

    #[tokio::test]
    async fn test_policy_reusable_across_runs() {
        let policy: Policy<u32> = create(handlers![tries(3), delay_ms(0)]);

        for _ in 0..2 {
            let calls = AtomicU32::new(0);
            let counter = &calls;
            let result = policy
                .run(move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), u32>(1)
                })
                .await;
            assert_eq!(result, Err(1));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }
    }

    #[test]
    fn test_empty_policy() {
        let policy = Policy::<u32>::default();
        assert!(policy.is_empty());
        assert!(policy.chain(Vec::new()).is_empty());
    }

    #[test]
    fn test_debug_lists_handler_names() {
        let policy: Policy<u32> = create(handlers![tries(3)]).postfix(handlers![delay_ms(5)]);
        assert_eq!(
            format!("{policy:?}"),
            r#"Policy { prefix: ["tries"], postfix: ["delay"] }"#
        );
    }
}
