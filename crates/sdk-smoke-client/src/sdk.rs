use crate::error::SdkError;
use crate::network::Network;
use crate::types::{
    BalanceEntry, BatchEstimate, ExchangeRequest, Offer, SubmissionReceipt, SubmitOptions,
    TransactionDescriptor,
};
use alloy_primitives::Address;
use async_trait::async_trait;

/// Calls the smoke suite makes against a wallet SDK session.
///
/// One value of this trait is one initialised session: it is bound to a
/// signing key and a network, and owns a single pending batch. Batch calls
/// therefore mutate session state and must not be issued concurrently by
/// independent scenarios.
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// Network the session was initialised for.
    fn network(&self) -> Network;

    /// Externally owned address derived from the session key.
    fn account_address(&self) -> Address;

    /// Resolves the counterfactual smart-account address of the session.
    async fn smart_account_address(&self) -> Result<Address, SdkError>;

    /// Balances of the smart account on `chain_id`.
    async fn balances(&self, chain_id: u64) -> Result<Vec<BalanceEntry>, SdkError>;

    /// Same-chain exchange offers.
    async fn exchange_offers(&self, request: &ExchangeRequest) -> Result<Vec<Offer>, SdkError>;

    /// Cross-chain bridge quotes.
    async fn cross_chain_quotes(&self, request: &ExchangeRequest)
        -> Result<Vec<Offer>, SdkError>;

    /// Multi-step routes discovered by the advanced routing provider.
    async fn advance_routes(&self, request: &ExchangeRequest) -> Result<Vec<Offer>, SdkError>;

    /// Appends a transaction to the pending batch and returns the batch.
    async fn add_to_batch(
        &self,
        transaction: TransactionDescriptor,
    ) -> Result<Vec<TransactionDescriptor>, SdkError>;

    /// Estimates gas and fees of the pending batch.
    ///
    /// Fails with [`SdkError::EmptyBatch`] when nothing was added and with
    /// [`SdkError::WouldRevert`] when a transaction would revert.
    async fn estimate_batch(&self) -> Result<BatchEstimate, SdkError>;

    /// Signs and sends the estimated batch.
    ///
    /// Fails with [`SdkError::NotEstimated`] unless the current batch was
    /// estimated since its last change.
    async fn submit_batch(&self, options: SubmitOptions) -> Result<SubmissionReceipt, SdkError>;

    /// Drops the pending batch and its estimate.
    async fn clear_batch(&self) -> Result<(), SdkError>;
}

/// Reference USD prices for cross-checking quoted exchange rates.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// USD price of one whole `token` on `chain_id`.
    async fn usd_price(&self, chain_id: u64, token: Address) -> Result<f64, SdkError>;
}
