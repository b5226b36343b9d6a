use crate::config::RetrySettings;
use crate::context::SuiteContext;
use crate::report::CheckReport;
use sdk_smoke_client::WalletSdk;
use sdk_smoke_core::{AttemptTimeout, Classify, HarnessError};
use sdk_smoke_retry::RetryConfig;
use std::fmt;
use std::future::Future;
use tracing::{info, warn};

/// Result of one scenario: exactly one of pass, fail or skip.
#[derive(Debug)]
pub enum Outcome<E> {
    /// Every check held.
    Passed,
    /// A collaborator call failed after retrying, or a check failed.
    Failed { error: HarnessError<E> },
    /// The balance gate blocked the scenario; nothing was called.
    Skipped { reason: String },
}

impl<E> Outcome<E> {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    /// The failure, if the scenario failed.
    pub fn error(&self) -> Option<&HarnessError<E>> {
        match self {
            Outcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Converts the outcome into a test result, treating a skip as success.
    pub fn into_result(self) -> Result<(), HarnessError<E>> {
        match self {
            Outcome::Failed { error } => Err(error),
            Outcome::Passed | Outcome::Skipped { .. } => Ok(()),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Outcome<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed { error } => write!(f, "failed: {error}"),
            Outcome::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// Runs scenarios with the suite's retry settings.
///
/// A scenario is split into a `fetch` step, which performs the
/// network-dependent calls and is retried, and an `assert` step, which
/// inspects the fetched value and runs exactly once. A failing check is
/// therefore never retried.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    retry: RetrySettings,
}

impl ScenarioRunner {
    pub fn new(retry: RetrySettings) -> Self {
        Self { retry }
    }

    /// Retry settings applied to every `fetch`.
    pub fn retry_settings(&self) -> &RetrySettings {
        &self.retry
    }

    /// Retry configuration for scenario `name`.
    pub fn retry_config<E>(&self, name: &str) -> RetryConfig<E>
    where
        E: Classify + From<AttemptTimeout> + 'static,
    {
        self.retry
            .builder::<E>()
            .name(name)
            .on_retry({
                let name = name.to_string();
                move |attempt, delay| {
                    warn!(scenario = %name, attempt, delay_ms = delay.as_millis(), "attempt failed, retrying");
                }
            })
            .build()
    }

    /// Runs scenario `name`.
    ///
    /// Skips without calling `fetch` when `ctx` is not eligible. Otherwise
    /// retries `fetch`; if it still fails the scenario fails with the last
    /// error. The fetched value is then handed to `assert` once.
    pub async fn run<S, T, E, F, Fut, A>(
        &self,
        name: &str,
        ctx: &SuiteContext<S>,
        fetch: F,
        assert: A,
    ) -> Outcome<E>
    where
        S: WalletSdk,
        E: Classify + From<AttemptTimeout> + fmt::Display + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: FnOnce(&T, &mut CheckReport),
    {
        if let Some(reason) = ctx.skip_reason() {
            info!(scenario = name, network = %ctx.network(), %reason, "skipping scenario");
            return Outcome::Skipped { reason };
        }
        self.run_ungated(name, fetch, assert).await
    }

    /// Runs scenario `name` regardless of balances.
    ///
    /// For scenarios that spend nothing, such as validation checks.
    pub async fn run_ungated<T, E, F, Fut, A>(&self, name: &str, fetch: F, assert: A) -> Outcome<E>
    where
        E: Classify + From<AttemptTimeout> + fmt::Display + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: FnOnce(&T, &mut CheckReport),
    {
        let config = self.retry_config::<E>(name);
        let value = match config.run(fetch).await {
            Ok(value) => value,
            Err(error) => {
                warn!(scenario = name, kind = %error.failure_kind(), %error, "scenario failed");
                return Outcome::Failed {
                    error: HarnessError::Call(error),
                };
            }
        };

        let mut report = CheckReport::new();
        assert(&value, &mut report);
        match report.into_result() {
            Ok(()) => {
                info!(scenario = name, "scenario passed");
                Outcome::Passed
            }
            Err(error) => {
                warn!(scenario = name, %error, "scenario failed");
                Outcome::Failed { error }
            }
        }
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(RetrySettings::default())
    }
}
