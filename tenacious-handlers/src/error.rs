//! Composite error for sequences where every attempt failed.

use std::fmt;
use thiserror::Error;

/// Every error from a retry sequence that gave up.
///
/// Built by [`aggregate`](crate::aggregate) collectors, for example:
///
/// ```ignore
/// let give_up = aggregate(tries(5), |errors: Vec<anyhow::Error>| {
///     anyhow::Error::new(Exhausted::new(errors))
/// });
/// ```
#[derive(Debug, Error)]
#[error("gave up after {} failed attempts", .errors.len())]
pub struct Exhausted<E: fmt::Debug> {
    /// Errors of each attempt, oldest first.
    pub errors: Vec<E>,
}

impl<E: fmt::Debug> Exhausted<E> {
    /// Wrap the error history.
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    /// Number of failed attempts.
    pub fn attempts(&self) -> usize {
        self.errors.len()
    }

    /// Error of the final attempt.
    pub fn last(&self) -> Option<&E> {
        self.errors.last()
    }

    /// Unwrap the error history.
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let exhausted = Exhausted::new(vec!["a", "b", "c"]);
        assert_eq!(exhausted.to_string(), "gave up after 3 failed attempts");
    }

    #[test]
    fn test_accessors() {
        let exhausted = Exhausted::new(vec![1, 2]);
        assert_eq!(exhausted.attempts(), 2);
        assert_eq!(exhausted.last(), Some(&2));
        assert_eq!(exhausted.into_errors(), vec![1, 2]);
    }

    #[test]
    fn test_into_anyhow() {
        let error = anyhow::Error::new(Exhausted::new(vec![anyhow::anyhow!("boom")]));
        let exhausted = error.downcast_ref::<Exhausted<anyhow::Error>>().unwrap();
        assert_eq!(exhausted.attempts(), 1);
    }
}
