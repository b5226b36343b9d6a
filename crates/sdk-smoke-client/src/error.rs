use sdk_smoke_core::{AttemptTimeout, Classify, FailureKind};

/// Errors reported by the wallet SDK and the price oracle.
///
/// Variants are distinguishable on purpose: scenarios assert that an empty
/// batch, an un-estimated submit and a reverting transaction each fail in
/// their own way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    /// The RPC node or provider could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The provider throttled the request.
    #[error("rate limited by provider")]
    RateLimited,

    /// A bounded attempt did not complete in time.
    #[error(transparent)]
    TimedOut(#[from] AttemptTimeout),

    /// The request itself is malformed.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The account cannot cover the requested amount.
    #[error("insufficient balance of {asset}")]
    InsufficientBalance { asset: String },

    /// The network is not served by this session or provider.
    #[error("unsupported chain id {0}")]
    UnsupportedNetwork(u64),

    /// Estimation was requested for a batch with no transactions.
    #[error("cannot estimate an empty batch")]
    EmptyBatch,

    /// A transaction in the batch would revert.
    #[error("transaction would revert: {reason}")]
    WouldRevert { reason: String },

    /// Submission was requested before the batch was estimated.
    #[error("batch must be estimated before it is submitted")]
    NotEstimated,
}

impl SdkError {
    /// Shorthand for a [`SdkError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SdkError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Classify for SdkError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            SdkError::Network(_) | SdkError::RateLimited | SdkError::TimedOut(_) => {
                FailureKind::Transient
            }
            SdkError::Validation { .. }
            | SdkError::InsufficientBalance { .. }
            | SdkError::UnsupportedNetwork(_)
            | SdkError::EmptyBatch
            | SdkError::WouldRevert { .. }
            | SdkError::NotEstimated => FailureKind::Validation,
        }
    }
}
