//! # tenacious-core
//!
//! Retry engine and handler protocol for tenacious.
//!
//! An action is re-executed until it succeeds or one handler in an ordered
//! chain refuses another attempt. Everything else in tenacious (matching,
//! delays, backoff, deadlines, attempt limits, reusable policies) is built
//! on the pieces defined here.
//!
//! ## Core Concepts
//!
//! - **[`retry`]**: Run an action against a handler chain
//! - **[`Handler`]**: Decide after each failure whether to continue
//! - **[`RetryState`]**: Attempt count, start time and error history
//! - **[`Abort`]**: How a handler ends the sequence
//! - **[`RETRY`]**: Sentinel error meaning "just try again"
//!
//! ## Example
//!
//! ```ignore
//! use tenacious_core::{from_fn, handlers, retry, Abort, RetryState};
//!
//! let give_up_after_three = from_fn(|state: &mut RetryState<std::io::Error>| {
//!     if state.attempts() >= 3 {
//!         Err(Abort::rethrow())
//!     } else {
//!         Ok(())
//!     }
//! });
//!
//! let contents = retry(
//!     || tokio::fs::read_to_string("config.toml"),
//!     &handlers![give_up_after_three],
//! )
//! .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod executor;
pub mod handler;
pub mod signal;
pub mod state;

// Re-exports
pub use executor::retry;
pub use handler::{
    boxed, from_fn, Abort, BoxedHandler, ErrorCollector, FnHandler, Handler, HandlerResult,
};
pub use signal::{RetrySignal, RetrySignalExt, RETRY};
pub use state::RetryState;

/// Re-exported so handler implementors need not depend on it directly.
pub use async_trait::async_trait;
