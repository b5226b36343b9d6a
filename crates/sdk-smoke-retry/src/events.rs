use sdk_smoke_core::events::HarnessEvent;
use std::time::{Duration, Instant};

/// What happened to one attempt, or to the call as a whole.
///
/// `retry_name` is the name given to the [`RetryConfig`](crate::RetryConfig).
#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// An attempt failed and another one is about to be made.
    Retry {
        retry_name: String,
        timestamp: Instant,
        /// 1-based number of the attempt that just failed.
        attempt: usize,
        delay: Duration,
    },
    /// The body succeeded after `attempts` attempts.
    Success {
        retry_name: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// The body failed on the last permitted attempt.
    Error {
        retry_name: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// The body failed with an error the retry predicate rejected.
    IgnoredError {
        retry_name: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// An attempt was abandoned because it exceeded the per-attempt timeout.
    AttemptTimedOut {
        retry_name: String,
        timestamp: Instant,
        attempt: usize,
        timeout: Duration,
    },
}

impl RetryEvent {
    fn stamp(&self) -> (&str, Instant) {
        match self {
            RetryEvent::Retry { retry_name, timestamp, .. }
            | RetryEvent::Success { retry_name, timestamp, .. }
            | RetryEvent::Error { retry_name, timestamp, .. }
            | RetryEvent::IgnoredError { retry_name, timestamp, .. }
            | RetryEvent::AttemptTimedOut { retry_name, timestamp, .. } => (retry_name, *timestamp),
        }
    }
}

impl HarnessEvent for RetryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RetryEvent::Retry { .. } => "Retry",
            RetryEvent::Success { .. } => "Success",
            RetryEvent::Error { .. } => "Error",
            RetryEvent::IgnoredError { .. } => "IgnoredError",
            RetryEvent::AttemptTimedOut { .. } => "AttemptTimedOut",
        }
    }

    fn timestamp(&self) -> Instant {
        self.stamp().1
    }

    fn source_name(&self) -> &str {
        self.stamp().0
    }
}
