//! # tenacious-handlers
//!
//! Built-in retry handlers and reusable retry policies for tenacious.
//!
//! Every handler here implements [`tenacious_core::Handler`] for any error
//! type it can inspect, so built-ins and user-defined handlers mix freely in
//! one chain.
//!
//! ## Handlers
//!
//! | Factory | Behavior |
//! |---------|----------|
//! | [`if_error_matches`] | Retry only errors accepted by a [`Matcher`] |
//! | [`if_true`] / [`if_true_async`] | Retry while a predicate holds |
//! | [`explicitly`] | Retry only the `RETRY` sentinel |
//! | [`delay`] / [`delay_ms`] / [`delay_sec`] | Fixed wait before each retry |
//! | [`deadline`] / [`deadline_ms`] / [`deadline_sec`] | Give up after total elapsed time |
//! | [`tries`] | Give up after a number of attempts |
//! | [`exponential_backoff`] | Growing wait, capped attempts |
//! | [`aggregate`] | Fail with every attempt's error instead of the last |
//!
//! Put filtering handlers first and time-based handlers last, so that an
//! unexpected or exhausted error aborts before a delay is paid.
//!
//! ## Policies
//!
//! [`create`] freezes a handler list into a [`Policy`] that can be run many
//! times and extended with [`Policy::prefix`] / [`Policy::postfix`].
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `pattern` | [`Matcher::shape`] deep partial matching via `serde_json` | ✅ |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod backoff;
pub mod config;
pub mod delay;
pub mod error;
pub mod limits;
pub mod matching;
pub mod policy;
#[cfg(feature = "pattern")]
pub mod shape;

use std::time::Duration;

// Re-exports
pub use aggregate::{aggregate, Aggregate};
pub use backoff::{exponential_backoff, ExponentialBackoff};
pub use config::ExponentialBackoffOptions;
pub use delay::{delay, delay_ms, delay_sec, FixedDelay};
pub use error::Exhausted;
pub use limits::{deadline, deadline_ms, deadline_sec, tries, Deadline, Tries};
pub use matching::{
    explicitly, if_error_matches, if_true, if_true_async, ErrorMatches, Explicitly, IfTrue,
    IfTrueAsync, Matcher,
};
pub use policy::{create, create_with, Policy};

/// Seconds as a duration; negative or NaN is zero, too large saturates.
pub(crate) fn secs(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}
