//! Contracts of the wallet SDK exercised by the smoke suite.
//!
//! The suite never talks to a chain directly. Everything it needs from the
//! SDK is expressed by [`WalletSdk`] (one initialised session) and
//! [`PriceOracle`] (reference prices for rate cross-checks). Errors are
//! reported as [`SdkError`], which classifies itself as transient or
//! validation so the retry runner knows what to retry.
//!
//! With the `mock` feature the crate also ships [`MockWallet`] and
//! [`FixedPriceOracle`], in-memory implementations used by the test suite.

mod error;
#[cfg(feature = "mock")]
mod mock;
mod network;
mod sdk;
mod types;

pub use error::SdkError;
#[cfg(feature = "mock")]
pub use mock::{FixedPriceOracle, MockWallet, MockWalletBuilder, Operation};
pub use network::Network;
pub use sdk::{PriceOracle, WalletSdk};
pub use types::{
    BalanceEntry, BatchEstimate, ExchangeRequest, Offer, SessionInit, SubmissionReceipt,
    SubmitOptions, TransactionDescriptor,
};

pub use async_trait::async_trait;
