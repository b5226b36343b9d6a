use crate::backoff::{ExponentialBackoff, FixedInterval, IntervalFunction};
use crate::events::RetryEvent;
use crate::policy::{RetryPolicy, TimeoutConversion};
use crate::timeout::{AttemptTimeout, InvalidRetryConfig};
use sdk_smoke_core::events::{EventListeners, FnListener};
use sdk_smoke_core::Classify;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_ATTEMPTS: usize = 3;
const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// A named retry policy plus the listeners that observe its runs.
///
/// Built once per suite and shared by every scenario; running a body does
/// not mutate it.
pub struct RetryConfig<E> {
    pub(crate) policy: RetryPolicy<E>,
    pub(crate) listeners: EventListeners<RetryEvent>,
    pub(crate) name: String,
}

impl<E> RetryConfig<E> {
    pub fn builder() -> RetryConfigBuilder<E> {
        RetryConfigBuilder::new()
    }

    pub fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }

    /// Label used in events, log fields and metric labels.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `body` under this configuration. See [`run_with_retry`](crate::run_with_retry).
    pub async fn run<T, F, Fut>(&self, body: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        crate::run_with_retry(body, self).await
    }

    /// Wraps this configuration in a [`RetryLayer`](crate::RetryLayer).
    pub fn layer(self) -> crate::RetryLayer<E> {
        crate::RetryLayer::new(self)
    }
}

/// Collects retry settings; finish with [`build`](Self::build) or
/// [`try_build`](Self::try_build).
///
/// Without further calls the result makes 3 attempts 1s apart, retries
/// every error, never times an attempt out and is named `"<unnamed>"`.
pub struct RetryConfigBuilder<E> {
    policy: RetryPolicy<E>,
    listeners: EventListeners<RetryEvent>,
    name: String,
}

impl<E> Default for RetryConfigBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RetryConfigBuilder<E> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::new(DEFAULT_ATTEMPTS, Arc::new(FixedInterval::new(DEFAULT_DELAY))),
            listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Total invocations allowed, the first one included. `1` means the
    /// body is never retried.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    /// Waits `duration` after every failed attempt.
    pub fn fixed_backoff(self, duration: Duration) -> Self {
        self.backoff(FixedInterval::new(duration))
    }

    /// Starts the next attempt straight after a failure.
    pub fn no_delay(self) -> Self {
        self.fixed_backoff(Duration::ZERO)
    }

    /// Doubles the wait after each failure, starting at `initial_interval`.
    pub fn exponential_backoff(self, initial_interval: Duration) -> Self {
        self.backoff(ExponentialBackoff::new(initial_interval))
    }

    pub fn backoff<I>(mut self, delays: I) -> Self
    where
        I: IntervalFunction + 'static,
    {
        self.policy.delays = Arc::new(delays);
        self
    }

    /// Limits retrying to errors for which `predicate` returns `true`.
    ///
    /// A rejected error goes back to the caller at once, however many
    /// attempts remain.
    pub fn retry_on<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.policy.retryable = Some(Arc::new(predicate));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn subscribe(mut self, listener: impl Fn(&RetryEvent) + Send + Sync + 'static) -> Self {
        self.listeners.add(FnListener::new(listener));
        self
    }

    /// Called with the 1-based number of the attempt that just failed and
    /// the wait before the next one, before the wait starts.
    pub fn on_retry<F>(self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.subscribe(move |event| {
            if let RetryEvent::Retry { attempt, delay, .. } = event {
                f(*attempt, *delay);
            }
        })
    }

    /// Called with the number of attempts a successful run took.
    pub fn on_success<F>(self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(move |event| {
            if let RetryEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        })
    }

    /// Called when the last permitted attempt has failed.
    pub fn on_error<F>(self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(move |event| {
            if let RetryEvent::Error { attempts, .. } = event {
                f(*attempts);
            }
        })
    }

    /// Called when the [`retry_on`](Self::retry_on) predicate turns an
    /// error away.
    pub fn on_ignored_error<F>(self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(move |event| {
            if let RetryEvent::IgnoredError { attempts, .. } = event {
                f(*attempts);
            }
        })
    }

    pub fn on_attempt_timeout<F>(self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.subscribe(move |event| {
            if let RetryEvent::AttemptTimedOut {
                attempt, timeout, ..
            } = event
            {
                f(*attempt, *timeout);
            }
        })
    }

    /// Finishes the configuration. A `max_attempts` of 0 becomes 1.
    pub fn build(mut self) -> RetryConfig<E> {
        self.policy.max_attempts = self.policy.max_attempts.max(1);
        RetryConfig {
            policy: self.policy,
            listeners: self.listeners,
            name: self.name,
        }
    }

    /// Like [`build`](Self::build), but reports zero attempts or a zero
    /// timeout instead of clamping them.
    pub fn try_build(self) -> Result<RetryConfig<E>, InvalidRetryConfig> {
        if self.policy.max_attempts == 0 {
            return Err(InvalidRetryConfig::ZeroAttempts);
        }
        if self.policy.attempt_timeout().is_some_and(|limit| limit.is_zero()) {
            return Err(InvalidRetryConfig::ZeroTimeout);
        }
        Ok(self.build())
    }
}

impl<E: Classify + 'static> RetryConfigBuilder<E> {
    /// Only retries errors classified as transient.
    ///
    /// Validation and assertion failures are returned after the first
    /// attempt; retrying an invalid request never helps.
    pub fn retry_transient_only(self) -> Self {
        self.retry_on(|error: &E| error.is_transient())
    }
}

impl<E: From<AttemptTimeout>> RetryConfigBuilder<E> {
    /// Bounds every attempt to `timeout`.
    ///
    /// An attempt still pending when the timeout fires is dropped and counts
    /// as a failed attempt with an [`AttemptTimeout`] error converted into `E`.
    /// The next attempt only starts after the previous one has been dropped.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        let convert: TimeoutConversion<E> = E::from;
        self.policy.attempt_timeout = Some((timeout, convert));
        self
    }
}
