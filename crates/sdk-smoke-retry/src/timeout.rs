pub use sdk_smoke_core::AttemptTimeout;

/// The retry configuration is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRetryConfig {
    /// `max_attempts` must allow at least one invocation.
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    /// A zero per-attempt timeout would fail every attempt before it starts.
    #[error("attempt timeout must be greater than zero")]
    ZeroTimeout,
}
