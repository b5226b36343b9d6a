//! Failure taxonomy shared by the retry runner and the suite harness.
//!
//! Every error that reaches the harness falls into one of three kinds:
//!
//! - [`FailureKind::Transient`]: the collaborator call failed for timing or
//!   availability reasons. Retrying may help.
//! - [`FailureKind::Validation`]: the collaborator rejected the request
//!   itself (bad address, bad amount, empty batch). Retrying never helps.
//! - [`FailureKind::Assertion`]: the scenario's own correctness check
//!   failed. Always reported, never retried.
//!
//! A balance gate that blocks a scenario is not an error at all; it is
//! reported as a skip by the runner.
//!
//! ```
//! use sdk_smoke_core::{Classify, FailureKind};
//!
//! #[derive(Debug)]
//! enum RpcError {
//!     Unavailable,
//!     BadAddress(String),
//! }
//!
//! impl Classify for RpcError {
//!     fn failure_kind(&self) -> FailureKind {
//!         match self {
//!             RpcError::Unavailable => FailureKind::Transient,
//!             RpcError::BadAddress(_) => FailureKind::Validation,
//!         }
//!     }
//! }
//!
//! assert!(RpcError::Unavailable.is_transient());
//! assert!(!RpcError::BadAddress("0x".into()).is_transient());
//! ```

use std::fmt;
use std::time::Duration;

/// The kind of a failure, as far as retrying and reporting are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Timing or availability failure of an external call.
    Transient,
    /// The external SDK rejected malformed input.
    Validation,
    /// A scenario's own correctness check failed.
    Assertion,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transient => write!(f, "transient"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Assertion => write!(f, "assertion"),
        }
    }
}

/// Classifies an error into a [`FailureKind`].
pub trait Classify {
    /// Returns the kind of this failure.
    fn failure_kind(&self) -> FailureKind;

    /// Returns `true` if retrying could make this failure go away.
    fn is_transient(&self) -> bool {
        self.failure_kind() == FailureKind::Transient
    }
}

/// A single attempt did not settle within its per-attempt timeout.
///
/// Collaborator error types implement `From<AttemptTimeout>` so that a
/// bounded attempt fails with the same error type as an unbounded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("attempt {attempt} did not complete within {timeout:?}")]
pub struct AttemptTimeout {
    /// 1-based attempt number that timed out.
    pub attempt: usize,
    /// The configured per-attempt timeout.
    pub timeout: Duration,
}

/// A single failed soft check, as recorded by a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    /// Short name of the check (e.g. `"offers not empty"`).
    pub name: String,
    /// What was observed instead.
    pub detail: String,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.detail)
    }
}

/// Error type surfaced by a scenario to the test reporter.
///
/// `E` is the collaborator's error type, preserved unchanged so callers can
/// still match on its shape.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HarnessError<E> {
    /// The collaborator call failed (after any retries).
    #[error("collaborator call failed: {0}")]
    Call(E),

    /// One or more soft checks failed.
    #[error("{} check(s) failed: {}", .failures.len(), render_failures(.failures))]
    Assertion {
        /// Every failed check, in the order it was recorded.
        failures: Vec<CheckFailure>,
    },
}

fn render_failures(failures: &[CheckFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl<E> HarnessError<E> {
    /// Returns the collaborator error, if this is a `Call` failure.
    pub fn call_error(&self) -> Option<&E> {
        match self {
            HarnessError::Call(e) => Some(e),
            HarnessError::Assertion { .. } => None,
        }
    }

    /// Returns the failed checks, if this is an `Assertion` failure.
    pub fn check_failures(&self) -> &[CheckFailure] {
        match self {
            HarnessError::Call(_) => &[],
            HarnessError::Assertion { failures } => failures,
        }
    }
}

impl<E: Classify> Classify for HarnessError<E> {
    fn failure_kind(&self) -> FailureKind {
        match self {
            HarnessError::Call(e) => e.failure_kind(),
            HarnessError::Assertion { .. } => FailureKind::Assertion,
        }
    }
}
