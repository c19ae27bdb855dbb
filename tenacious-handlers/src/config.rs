//! Backoff configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for [`ExponentialBackoff`](crate::ExponentialBackoff).
///
/// Deserializes with every field optional; durations are integer
/// milliseconds:
///
/// ```json
/// { "jitter": true, "initial_delay_ms": 1000, "max_delay_ms": 5000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExponentialBackoffOptions {
    /// Multiply each delay by a random factor in `[0, 1)`.
    pub jitter: bool,
    /// Upper bound on a single delay. `None` means unbounded.
    #[serde(rename = "max_delay_ms", with = "duration_ms::option")]
    pub max_delay: Option<Duration>,
    /// Delay after the first failure.
    #[serde(rename = "initial_delay_ms", with = "duration_ms")]
    pub initial_delay: Duration,
    /// Abort once this many attempts have failed.
    pub max_attempts: u32,
    /// Factor applied to the delay for each further attempt.
    pub time_multiple: f64,
}

impl Default for ExponentialBackoffOptions {
    fn default() -> Self {
        Self {
            jitter: false,
            max_delay: None,
            initial_delay: Duration::from_millis(100),
            max_attempts: 10,
            time_multiple: 2.0,
        }
    }
}

impl ExponentialBackoffOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Cap each delay.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Set the delay after the first failure.
    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the attempt limit.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the growth factor.
    #[must_use]
    pub fn with_time_multiple(mut self, time_multiple: f64) -> Self {
        self.time_multiple = time_multiple;
        self
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
        }
    }
}
