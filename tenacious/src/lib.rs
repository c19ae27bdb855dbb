//! # Tenacious - Composable Async Retries
//!
//! Tenacious re-runs a fallible async operation under a chain of pluggable
//! handlers. After every failure each handler, in order, may let the
//! sequence continue, rewrite the error, wait, or abort with a terminal
//! error. Handlers compose into reusable [`Policy`] values that can be
//! extended per call site without touching the original.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tenacious::prelude::*;
//!
//! // Only retry the database's "still scaling" error, give up after 15s,
//! // and back off exponentially in between.
//! let retry_db = create(handlers![
//!     if_error_matches([Matcher::shape(json!({"code": "DB_INSUFFICIENT_SCALE"}))]),
//!     deadline_sec(15.0),
//!     exponential_backoff(
//!         ExponentialBackoffOptions::new()
//!             .with_max_delay(Duration::from_secs(5))
//!             .with_jitter(true),
//!     ),
//! ]);
//!
//! let account = retry_db.run(|| db.get_account("156")).await?;
//! let posts = retry_db.run(|| db.get_posts_for_account(&account)).await?;
//!
//! // One-off chains work without a policy.
//! retry(|| cleanup_cache(), &handlers![tries(20), delay_ms(100)]).await?;
//! ```
//!
//! ## Handler Contract
//!
//! - Returning `Ok(())` permits another attempt.
//! - Returning `Err(Abort::Rethrow)` ends the sequence with the current error.
//! - Returning `Err(Abort::Raise(e))` ends it with `e` instead.
//! - Returning `Err(Abort::Collect(f))` ends it with `f(every error so far)`.
//!
//! Handlers run one at a time, each fully awaited, and see any error rewrite
//! made by the handlers before them. The action always runs at least once;
//! an empty chain retries until the action succeeds. Nothing ever interrupts
//! an attempt in flight: deadlines only stop the *next* attempt.
//!
//! ## Architecture
//!
//! - [`tenacious_core`] - Retry engine, handler trait, retry state, `RETRY` sentinel
//! - [`tenacious_handlers`] - Built-in handlers and the policy builder
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `pattern` | Match errors against JSON shapes with [`Matcher::shape`] | ✅ |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tenacious_core;
pub use tenacious_handlers;

// ============================================================================
// Engine
// ============================================================================

pub use tenacious_core::{
    async_trait, boxed, from_fn, handlers, retry, Abort, BoxedHandler, ErrorCollector, FnHandler,
    Handler, HandlerResult, RetrySignal, RetrySignalExt, RetryState, RETRY,
};

// ============================================================================
// Handlers & Policies
// ============================================================================

pub use tenacious_handlers::{
    aggregate, create, create_with, deadline, deadline_ms, deadline_sec, delay, delay_ms,
    delay_sec, explicitly, exponential_backoff, if_error_matches, if_true, if_true_async, tries,
    Aggregate, Deadline, ErrorMatches, Exhausted, Explicitly, ExponentialBackoff,
    ExponentialBackoffOptions, FixedDelay, IfTrue, IfTrueAsync, Matcher, Policy, Tries,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        aggregate, async_trait, create, create_with, deadline, deadline_ms, deadline_sec, delay,
        delay_ms, delay_sec, explicitly, exponential_backoff, from_fn, handlers, if_error_matches,
        if_true, if_true_async, retry, tries, Abort, BoxedHandler, Exhausted,
        ExponentialBackoffOptions, Handler, HandlerResult, Matcher, Policy, RetrySignalExt,
        RetryState, RETRY,
    };
    pub use std::time::Duration;

    #[cfg(feature = "pattern")]
    pub use serde_json::json;
}
