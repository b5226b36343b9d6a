//! Suite configuration.
//!
//! A suite run is configured once, from a JSON document or from `SMOKE_*`
//! environment variables, and is read-only afterwards.

use sdk_smoke_client::Network;
use sdk_smoke_core::{AttemptTimeout, Classify};
use sdk_smoke_gate::{Amount, AssetId, EligibilityThresholds};
use sdk_smoke_retry::{RetryConfig, RetryConfigBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Network the suite targets.
pub const ENV_NETWORK: &str = "SMOKE_NETWORK";
/// Minimum native balance, as a decimal string.
pub const ENV_MIN_NATIVE: &str = "SMOKE_MIN_NATIVE";
/// Minimum balance of each required token, as a decimal string.
pub const ENV_MIN_TOKEN: &str = "SMOKE_MIN_TOKEN";
/// Comma-separated required token identifiers.
pub const ENV_REQUIRED_ASSETS: &str = "SMOKE_REQUIRED_ASSETS";
/// Attempts per retried call, including the first.
pub const ENV_RETRY_ATTEMPTS: &str = "SMOKE_RETRY_ATTEMPTS";
/// Delay between attempts in milliseconds.
pub const ENV_RETRY_DELAY_MS: &str = "SMOKE_RETRY_DELAY_MS";
/// Per-attempt timeout in milliseconds; unset or `0` disables it.
pub const ENV_ATTEMPT_TIMEOUT_MS: &str = "SMOKE_ATTEMPT_TIMEOUT_MS";

/// Errors raised while loading a [`SuiteConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid suite configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("rate_tolerance must be a finite non-negative ratio, got {0}")]
    InvalidTolerance(f64),
}

/// Retry settings shared by every retried call of the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub max_attempts: usize,
    pub delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            attempt_timeout_ms: None,
        }
    }
}

impl RetrySettings {
    /// Delay between attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Per-attempt timeout, if one is configured.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Builder preloaded with these settings.
    ///
    /// Only transient failures are retried.
    pub fn builder<E>(&self) -> RetryConfigBuilder<E>
    where
        E: Classify + From<AttemptTimeout> + 'static,
    {
        let builder = RetryConfig::<E>::builder()
            .max_attempts(self.max_attempts)
            .fixed_backoff(self.delay())
            .retry_transient_only();
        match self.attempt_timeout() {
            Some(timeout) => builder.attempt_timeout(timeout),
            None => builder,
        }
    }
}

/// Read-only configuration of a suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    pub network: Network,
    pub thresholds: EligibilityThresholds,
    pub required_assets: Vec<AssetId>,
    pub retry: RetrySettings,
    /// Accepted relative deviation of a quoted rate from the oracle rate.
    pub rate_tolerance: f64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            network: Network::Sepolia,
            thresholds: EligibilityThresholds::default(),
            required_assets: Vec::new(),
            retry: RetrySettings::default(),
            rate_tolerance: 0.05,
        }
    }
}

impl SuiteConfig {
    /// Parses a JSON document. Absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from the `SMOKE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Loads the configuration from `lookup`, which maps a variable name to
    /// its value. Unset and empty variables keep their defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (name, value))
        };

        let mut config = Self::default();

        if let Some((name, value)) = var(ENV_NETWORK) {
            config.network = value.parse().map_err(|err| invalid(name, &value, err))?;
        }
        if let Some((name, value)) = var(ENV_MIN_NATIVE) {
            config.thresholds.minimum_native_balance = parse_amount(name, &value)?;
        }
        if let Some((name, value)) = var(ENV_MIN_TOKEN) {
            config.thresholds.minimum_token_balance = parse_amount(name, &value)?;
        }
        if let Some((_, value)) = var(ENV_REQUIRED_ASSETS) {
            config.required_assets = value
                .split(',')
                .map(str::trim)
                .filter(|asset| !asset.is_empty())
                .map(AssetId::from)
                .collect();
        }
        if let Some((name, value)) = var(ENV_RETRY_ATTEMPTS) {
            config.retry.max_attempts = value.parse().map_err(|err| invalid(name, &value, err))?;
        }
        if let Some((name, value)) = var(ENV_RETRY_DELAY_MS) {
            config.retry.delay_ms = value.parse().map_err(|err| invalid(name, &value, err))?;
        }
        if let Some((name, value)) = var(ENV_ATTEMPT_TIMEOUT_MS) {
            let ms: u64 = value.parse().map_err(|err| invalid(name, &value, err))?;
            config.retry.attempt_timeout_ms = (ms > 0).then_some(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if !self.rate_tolerance.is_finite() || self.rate_tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.rate_tolerance));
        }
        Ok(())
    }

    /// Retry configuration for the suite's calls.
    pub fn retry_config<E>(&self) -> RetryConfig<E>
    where
        E: Classify + From<AttemptTimeout> + 'static,
    {
        self.retry.builder::<E>().name("suite").build()
    }
}

fn parse_amount(name: &'static str, value: &str) -> Result<Amount, ConfigError> {
    value.parse().map_err(|err| invalid(name, value, err))
}

fn invalid(name: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
