//! Balance-gated scenario eligibility.
//!
//! Smoke scenarios spend real funds from externally funded test wallets.
//! When a wallet runs dry the scenario cannot say anything about the SDK, so
//! instead of failing it is skipped. This crate makes that decision:
//!
//! - [`is_eligible`] / [`evaluate`]: pure functions of a [`BalanceSnapshot`],
//!   [`EligibilityThresholds`] and the set of required tokens.
//! - [`BalanceGate`]: a named, preconfigured gate that also emits
//!   [`GateEvent`]s, log lines (`tracing` feature) and counters
//!   (`metrics` feature).
//!
//! Balances use [`Amount`], an exact decimal built on `U256`, so a balance
//! equal to its threshold is never mistaken for one just above it.

mod amount;
mod events;
mod gate;
mod snapshot;

pub use amount::{Amount, AmountParseError, MAX_DECIMALS};
pub use events::GateEvent;
pub use gate::{
    evaluate, is_eligible, BalanceGate, BalanceGateBuilder, Eligibility, EligibilityThresholds,
    Shortfall,
};
pub use snapshot::{AssetId, BalanceSnapshot, TokenId};
