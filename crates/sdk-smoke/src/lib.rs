//! Smoke-test harness for the wallet SDK.
//!
//! A test case goes through three steps:
//!
//! 1. [`SuiteContext::setup`] resolves the smart account, reads balances and
//!    evaluates the balance gate. The context is built per test case and
//!    passed explicitly; there is no shared global session.
//! 2. [`ScenarioRunner::run`] skips the scenario when the gate is closed.
//!    Otherwise it retries the network-dependent `fetch` step and hands the
//!    result to the `assert` step, which runs once and records soft checks
//!    into a [`CheckReport`].
//! 3. The scenario yields an [`Outcome`]: passed, failed with the last real
//!    error or the list of failed checks, or skipped with the gate's reason.
//!
//! ```no_run
//! use sdk_smoke::{scenarios, ScenarioRunner, SuiteConfig, SuiteContext};
//! use sdk_smoke_client::{ExchangeRequest, WalletSdk};
//!
//! async fn offers<S: WalletSdk>(sdk: S, request: ExchangeRequest) {
//!     let config = SuiteConfig::from_env().expect("valid SMOKE_* variables");
//!     let ctx = SuiteContext::setup(sdk, &config).await.expect("setup");
//!     let runner = ScenarioRunner::new(config.retry);
//!
//!     let outcome = scenarios::exchange_offers(&runner, &ctx, &request).await;
//!     outcome.into_result().expect("exchange offers");
//! }
//! ```

mod config;
mod context;
mod report;
mod runner;
pub mod scenarios;

pub use config::{
    ConfigError, RetrySettings, SuiteConfig, ENV_ATTEMPT_TIMEOUT_MS, ENV_MIN_NATIVE,
    ENV_MIN_TOKEN, ENV_NETWORK, ENV_REQUIRED_ASSETS, ENV_RETRY_ATTEMPTS, ENV_RETRY_DELAY_MS,
};
pub use context::SuiteContext;
pub use report::{CheckReport, SuiteReport};
pub use runner::{Outcome, ScenarioRunner};
