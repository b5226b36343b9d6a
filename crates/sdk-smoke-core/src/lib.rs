//! Core infrastructure for the wallet SDK smoke harness.
//!
//! This crate provides functionality shared by the retry runner, the
//! balance gate, and the suite harness:
//! - Event system for observability
//! - Failure taxonomy used to decide what is retried and how it is reported

pub mod error;
pub mod events;

pub use error::{AttemptTimeout, CheckFailure, Classify, FailureKind, HarnessError};
pub use events::{EventListener, EventListeners, FnListener, HarnessEvent};
