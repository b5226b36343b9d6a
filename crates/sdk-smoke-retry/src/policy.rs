use crate::backoff::IntervalFunction;
use crate::timeout::AttemptTimeout;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Predicate deciding whether an error may be retried.
pub type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Converts a timed-out attempt into the caller's error type.
pub(crate) type TimeoutConversion<E> = fn(AttemptTimeout) -> E;

/// Immutable retry policy: how many attempts, how long to wait, and which
/// errors are worth another attempt.
pub struct RetryPolicy<E> {
    pub(crate) max_attempts: usize,
    pub(crate) delays: Arc<dyn IntervalFunction>,
    pub(crate) retryable: Option<RetryPredicate<E>>,
    pub(crate) attempt_timeout: Option<(Duration, TimeoutConversion<E>)>,
}

impl<E> RetryPolicy<E> {
    pub(crate) fn new(max_attempts: usize, delays: Arc<dyn IntervalFunction>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
            retryable: None,
            attempt_timeout: None,
        }
    }

    /// Maximum number of invocations of the wrapped body, including the first.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Per-attempt timeout, if one is configured.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout.map(|(duration, _)| duration)
    }

    /// Returns `true` if `error` may be retried.
    pub fn should_retry(&self, error: &E) -> bool {
        self.retryable
            .as_ref()
            .is_none_or(|predicate| predicate(error))
    }

    /// Delay to wait after the failed attempt with 0-based index `attempt`.
    pub fn next_backoff(&self, attempt: usize) -> Duration {
        self.delays.next_interval(attempt)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            delays: Arc::clone(&self.delays),
            retryable: self.retryable.clone(),
            attempt_timeout: self.attempt_timeout,
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("filters_errors", &self.retryable.is_some())
            .field("attempt_timeout", &self.attempt_timeout())
            .finish()
    }
}
