//! Bounded retry for flaky, network-dependent async test bodies.
//!
//! Smoke tests against live networks fail for reasons unrelated to the
//! system under test: an RPC node times out, a quote provider is briefly
//! unavailable. This crate re-invokes such a body until it succeeds or a
//! fixed number of attempts is used up.
//!
//! # Guarantees
//!
//! - The body is invoked at least once and at most `max_attempts` times.
//! - Attempts are strictly sequential; the next one starts only after the
//!   previous one has settled (or been dropped by the per-attempt timeout).
//! - The first success is returned immediately.
//! - When every attempt fails, the error of the *last* attempt is returned
//!   unchanged, so callers can match on it exactly as if they had made the
//!   call directly.
//! - The delay between attempts is a `tokio::time::sleep`, never a blocking
//!   wait.
//!
//! The runner does not undo side effects of failed attempts. A retried body
//! must be idempotent or tolerate partial effects of an earlier attempt.
//!
//! # Examples
//!
//! ```
//! use sdk_smoke_retry::{run_with_retry, RetryConfig};
//! use std::time::Duration;
//!
//! # #[derive(Debug)]
//! # struct RpcError;
//! # async fn fetch_quote() -> Result<u64, RpcError> { Ok(42) }
//! # async fn example() -> Result<(), RpcError> {
//! let config: RetryConfig<RpcError> = RetryConfig::builder()
//!     .max_attempts(3)
//!     .fixed_backoff(Duration::from_millis(500))
//!     .on_retry(|attempt, delay| {
//!         println!("attempt {attempt} failed, retrying in {delay:?}");
//!     })
//!     .build();
//!
//! let quote = run_with_retry(|| fetch_quote(), &config).await?;
//! assert_eq!(quote, 42);
//! # Ok(())
//! # }
//! ```

mod backoff;
mod config;
mod events;
mod layer;
mod policy;
mod timeout;

pub use backoff::{
    ExponentialBackoff, ExponentialRandomBackoff, FixedInterval, FnInterval, IntervalFunction,
};
pub use config::{RetryConfig, RetryConfigBuilder};
pub use events::RetryEvent;
pub use layer::RetryLayer;
pub use policy::{RetryPolicy, RetryPredicate};
pub use timeout::{AttemptTimeout, InvalidRetryConfig};

use futures::future::BoxFuture;
#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::future::Future;
use std::sync::Arc;
#[cfg(feature = "metrics")]
use std::sync::Once;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::Service;
#[cfg(feature = "tracing")]
use tracing::{debug, warn};

#[cfg(feature = "metrics")]
static METRICS_INIT: Once = Once::new();

#[cfg(feature = "metrics")]
fn describe_metrics() {
    METRICS_INIT.call_once(|| {
        describe_counter!(
            "retry_calls_total",
            "Total number of retried calls by final result (success, exhausted, ignored)"
        );
        describe_counter!(
            "retry_attempts_total",
            "Total number of retries made after a failed attempt"
        );
        describe_histogram!(
            "retry_attempts",
            "Number of attempts made per call"
        );
    });
}

#[cfg(feature = "metrics")]
fn record_call(name: &str, result: &'static str, attempts: usize) {
    counter!("retry_calls_total", "retry" => name.to_string(), "result" => result).increment(1);
    histogram!("retry_attempts", "retry" => name.to_string()).record(attempts as f64);
}

/// Runs `body` until it succeeds, its error is not retryable, or
/// `max_attempts` invocations have failed.
///
/// Returns the first success, or the error of the last attempt made.
pub async fn run_with_retry<T, E, F, Fut>(mut body: F, config: &RetryConfig<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    #[cfg(feature = "metrics")]
    describe_metrics();

    let policy = &config.policy;
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = match policy.attempt_timeout {
            Some((limit, convert)) => match tokio::time::timeout(limit, body()).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    config.listeners.emit(&RetryEvent::AttemptTimedOut {
                        retry_name: config.name.clone(),
                        timestamp: Instant::now(),
                        attempt,
                        timeout: limit,
                    });

                    #[cfg(feature = "tracing")]
                    warn!(retry = %config.name, attempt, timeout_ms = limit.as_millis(), "attempt timed out");

                    Err(convert(AttemptTimeout {
                        attempt,
                        timeout: limit,
                    }))
                }
            },
            None => body().await,
        };

        let error = match result {
            Ok(value) => {
                config.listeners.emit(&RetryEvent::Success {
                    retry_name: config.name.clone(),
                    timestamp: Instant::now(),
                    attempts: attempt,
                });

                #[cfg(feature = "metrics")]
                record_call(&config.name, "success", attempt);

                #[cfg(feature = "tracing")]
                {
                    if attempt > 1 {
                        debug!(retry = %config.name, attempts = attempt, "succeeded after retrying");
                    }
                }

                return Ok(value);
            }
            Err(error) => error,
        };

        if !policy.should_retry(&error) {
            config.listeners.emit(&RetryEvent::IgnoredError {
                retry_name: config.name.clone(),
                timestamp: Instant::now(),
                attempts: attempt,
            });

            #[cfg(feature = "metrics")]
            record_call(&config.name, "ignored", attempt);

            #[cfg(feature = "tracing")]
            debug!(retry = %config.name, attempt, "error is not retryable");

            return Err(error);
        }

        if attempt >= policy.max_attempts {
            config.listeners.emit(&RetryEvent::Error {
                retry_name: config.name.clone(),
                timestamp: Instant::now(),
                attempts: attempt,
            });

            #[cfg(feature = "metrics")]
            record_call(&config.name, "exhausted", attempt);

            #[cfg(feature = "tracing")]
            warn!(retry = %config.name, attempts = attempt, "retries exhausted");

            return Err(error);
        }

        let delay = policy.next_backoff(attempt - 1);
        config.listeners.emit(&RetryEvent::Retry {
            retry_name: config.name.clone(),
            timestamp: Instant::now(),
            attempt,
            delay,
        });

        #[cfg(feature = "metrics")]
        counter!("retry_attempts_total", "retry" => config.name.clone()).increment(1);

        #[cfg(feature = "tracing")]
        debug!(retry = %config.name, attempt, delay_ms = delay.as_millis(), "attempt failed, retrying");

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// A Tower [`Service`] that retries failed requests.
///
/// Each attempt calls a clone of the inner service with a clone of the
/// request.
pub struct Retry<S, E> {
    inner: S,
    config: Arc<RetryConfig<E>>,
}

impl<S, E> Retry<S, E> {
    /// Creates a new `Retry` service wrapping the given service.
    pub fn new(inner: S, config: Arc<RetryConfig<E>>) -> Self {
        Self { inner, config }
    }
}

impl<S, E> Clone for Retry<S, E>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, E> Service<Req> for Retry<S, E>
where
    S: Service<Req, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    Req: Clone + Send + 'static,
    E: Send + 'static,
{
    type Response = S::Response;
    type Error = E;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let mut service = self.inner.clone();
        let config = Arc::clone(&self.config);

        Box::pin(async move { run_with_retry(move || service.call(req.clone()), &config).await })
    }
}
