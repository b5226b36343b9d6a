//! Request and response shapes of the wallet SDK.

use crate::error::SdkError;
use crate::network::Network;
use alloy_primitives::{Address, Bytes, B256, U256};
use sdk_smoke_gate::{Amount, AmountParseError, AssetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An unsigned transaction as returned by offer, quote and route calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescriptor {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl TransactionDescriptor {
    /// A plain value transfer with empty calldata.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self {
            to,
            data: Bytes::new(),
            value,
        }
    }
}

/// Token exchange or cross-chain transfer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    pub from_token: Address,
    pub to_token: Address,
    pub from_amount: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_chain_id: Option<u64>,
}

impl ExchangeRequest {
    /// A same-chain exchange request.
    pub fn new(from_token: Address, to_token: Address, from_amount: U256) -> Self {
        Self {
            from_token,
            to_token,
            from_amount,
            from_chain_id: None,
            to_chain_id: None,
        }
    }

    /// Turns this into a cross-chain request between two networks.
    pub fn cross_chain(mut self, from: Network, to: Network) -> Self {
        self.from_chain_id = Some(from.chain_id());
        self.to_chain_id = Some(to.chain_id());
        self
    }

    /// Returns `true` when source and destination chains differ.
    pub fn is_cross_chain(&self) -> bool {
        matches!((self.from_chain_id, self.to_chain_id), (Some(from), Some(to)) if from != to)
    }

    /// Checks the request the way the SDK does before calling a provider.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.from_amount.is_zero() {
            return Err(SdkError::validation("fromAmount", "must be greater than zero"));
        }
        if self.from_chain_id.is_some() != self.to_chain_id.is_some() {
            return Err(SdkError::validation(
                "chainId",
                "fromChainId and toChainId must be given together",
            ));
        }
        if !self.is_cross_chain() && self.from_token == self.to_token {
            return Err(SdkError::validation(
                "toTokenAddress",
                "must differ from fromTokenAddress on the same chain",
            ));
        }
        Ok(())
    }
}

/// An exchange offer, cross-chain quote or route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Provider that produced the offer (e.g. an aggregator or bridge).
    pub provider: String,
    /// Amount of `to_token` received, in raw units.
    pub receive_amount: U256,
    /// Exchange rate quoted by the provider, if any.
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    /// Transactions to batch and submit to take the offer.
    pub transactions: Vec<TransactionDescriptor>,
}

/// One balance row reported for the resolved account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub asset: AssetId,
    pub raw_balance: U256,
    pub decimals: u8,
}

impl BalanceEntry {
    /// The balance as an exact decimal.
    pub fn amount(&self) -> Result<Amount, AmountParseError> {
        Amount::from_raw(self.raw_balance, self.decimals)
    }
}

/// Gas and fee estimate of the pending batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEstimate {
    pub gas_limit: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    /// `gas_limit * max_fee_per_gas`, in native raw units.
    pub estimated_cost: U256,
}

/// Options of a batch submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOptions {
    /// Require the guardian co-signature.
    pub guarded: bool,
}

/// Receipt of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub hash: B256,
    pub nonce: u64,
    pub signatures: Vec<Bytes>,
    pub gas_limit: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub estimated_cost: U256,
}

impl SubmissionReceipt {
    /// Returns `true` if the echoed gas and fee fields equal `estimate`.
    pub fn matches_estimate(&self, estimate: &BatchEstimate) -> bool {
        self.gas_limit == estimate.gas_limit
            && self.max_fee_per_gas == estimate.max_fee_per_gas
            && self.max_priority_fee_per_gas == estimate.max_priority_fee_per_gas
            && self.estimated_cost == estimate.estimated_cost
    }
}

/// Inputs of the SDK's session initializer.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionInit {
    pub private_key: B256,
    pub network: Network,
}

impl SessionInit {
    /// Parses a hex private key (with or without `0x`).
    pub fn new(private_key: &str, network: Network) -> Result<Self, SdkError> {
        let trimmed = private_key.trim();
        let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let private_key = format!("0x{hex}")
            .parse::<B256>()
            .map_err(|_| SdkError::validation("privateKey", "expected 32 hex-encoded bytes"))?;
        if private_key.is_zero() {
            return Err(SdkError::validation("privateKey", "must not be zero"));
        }
        Ok(Self {
            private_key,
            network,
        })
    }

    /// Reads the key from `PRIVATE_KEY`.
    pub fn from_env(network: Network) -> Result<Self, SdkError> {
        let key = std::env::var("PRIVATE_KEY")
            .map_err(|_| SdkError::validation("PRIVATE_KEY", "environment variable is not set"))?;
        Self::new(&key, network)
    }
}

impl fmt::Debug for SessionInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInit")
            .field("private_key", &"<redacted>")
            .field("network", &self.network)
            .finish()
    }
}
