//! Delay strategies applied between failed attempts.

use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Computes the delay to wait before the next attempt.
///
/// `attempt` is the number of failed attempts so far minus one, so the
/// first delay (after the first failure) is `next_interval(0)`.
pub trait IntervalFunction: Send + Sync {
    /// Returns the delay before the next attempt.
    fn next_interval(&self, attempt: usize) -> Duration;
}

/// The same delay between every attempt.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    /// Creates a fixed interval. `Duration::ZERO` retries immediately.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl IntervalFunction for FixedInterval {
    fn next_interval(&self, _attempt: usize) -> Duration {
        self.interval
    }
}

/// Delay growing geometrically with every failure.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    initial_interval: Duration,
    multiplier: f64,
    max_interval: Option<Duration>,
}

impl ExponentialBackoff {
    /// Creates an exponential backoff doubling from `initial_interval`.
    pub fn new(initial_interval: Duration) -> Self {
        Self {
            initial_interval,
            multiplier: 2.0,
            max_interval: None,
        }
    }

    /// Sets the growth factor. Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Caps the delay. Default: uncapped
    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = Some(max_interval);
        self
    }

    fn base_interval(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let nanos = (self.initial_interval.as_nanos() as f64 * self.multiplier.powi(exponent)).round();
        let interval = if nanos.is_finite() && nanos < u64::MAX as f64 {
            Duration::from_nanos(nanos.max(0.0) as u64)
        } else {
            Duration::MAX
        };
        match self.max_interval {
            Some(max) => interval.min(max),
            None => interval,
        }
    }
}

impl IntervalFunction for ExponentialBackoff {
    fn next_interval(&self, attempt: usize) -> Duration {
        self.base_interval(attempt)
    }
}

/// Exponential backoff with jitter.
///
/// The delay is drawn uniformly from
/// `[base * (1 - factor), base * (1 + factor)]` and then capped.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialRandomBackoff {
    inner: ExponentialBackoff,
    randomization_factor: f64,
}

impl ExponentialRandomBackoff {
    /// Creates a jittered backoff. `randomization_factor` is clamped to `0.0..=1.0`.
    pub fn new(initial_interval: Duration, randomization_factor: f64) -> Self {
        Self {
            inner: ExponentialBackoff::new(initial_interval),
            randomization_factor: randomization_factor.clamp(0.0, 1.0),
        }
    }

    /// Sets the growth factor. Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.inner = self.inner.multiplier(multiplier);
        self
    }

    /// Caps the delay after jitter is applied.
    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.inner = self.inner.max_interval(max_interval);
        self
    }
}

impl IntervalFunction for ExponentialRandomBackoff {
    fn next_interval(&self, attempt: usize) -> Duration {
        let base = self.inner.base_interval(attempt);
        let secs = base.as_secs_f64();
        let delta = secs * self.randomization_factor;
        let interval = if delta > 0.0 && base < Duration::MAX {
            let jittered = rand::rng().random_range((secs - delta)..=(secs + delta));
            Duration::try_from_secs_f64(jittered.max(0.0)).unwrap_or(Duration::MAX)
        } else {
            base
        };
        match self.inner.max_interval {
            Some(max) => interval.min(max),
            None => interval,
        }
    }
}

/// Backoff computed by a closure of the attempt index.
#[derive(Clone)]
pub struct FnInterval {
    f: Arc<dyn Fn(usize) -> Duration + Send + Sync>,
}

impl FnInterval {
    /// Wraps `f` as an interval function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(usize) -> Duration + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl fmt::Debug for FnInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInterval").finish_non_exhaustive()
    }
}

impl IntervalFunction for FnInterval {
    fn next_interval(&self, attempt: usize) -> Duration {
        (self.f)(attempt)
    }
}
