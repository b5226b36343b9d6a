//! In-memory wallet session and price oracle.
//!
//! [`MockWallet`] answers from scripted data but runs the real batch state
//! machine (add, estimate, submit) so scenario ordering rules are enforced
//! exactly as a live session enforces them. Outages are scripted per
//! [`Operation`] to drive the retry paths deterministically.

use crate::error::SdkError;
use crate::network::Network;
use crate::sdk::{PriceOracle, WalletSdk};
use crate::types::{
    BalanceEntry, BatchEstimate, ExchangeRequest, Offer, SubmissionReceipt, SubmitOptions,
    TransactionDescriptor,
};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use sdk_smoke_gate::AssetId;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const BASE_GAS: u64 = 21_000;
const GAS_PER_TRANSACTION: u64 = 55_000;

/// Wallet calls that can be scripted and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SmartAccount,
    Balances,
    ExchangeOffers,
    CrossChainQuotes,
    AdvanceRoutes,
    AddToBatch,
    EstimateBatch,
    SubmitBatch,
    ClearBatch,
}

#[derive(Debug, Clone, Copy)]
enum Script {
    Fail,
    Stall,
}

#[derive(Debug, Default)]
struct Scripts {
    pending: HashMap<Operation, Vec<Script>>,
    calls: HashMap<Operation, usize>,
}

impl Scripts {
    fn begin(&mut self, operation: Operation) -> Option<Script> {
        *self.calls.entry(operation).or_default() += 1;
        let queue = self.pending.get_mut(&operation)?;
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }
}

#[derive(Debug, Default)]
struct BatchState {
    transactions: Vec<TransactionDescriptor>,
    estimate: Option<BatchEstimate>,
    nonce: u64,
}

/// Scripted [`WalletSdk`] session.
#[derive(Debug)]
pub struct MockWallet {
    network: Network,
    account: Address,
    smart_account: Address,
    balances: Vec<BalanceEntry>,
    offers: Vec<Offer>,
    quotes: Vec<Offer>,
    routes: Vec<Offer>,
    reverting: HashSet<Address>,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    latency: Duration,
    scripts: Mutex<Scripts>,
    batch: tokio::sync::Mutex<BatchState>,
}

impl MockWallet {
    /// Starts building a session on `network`.
    pub fn builder(network: Network) -> MockWalletBuilder {
        MockWalletBuilder::new(network)
    }

    /// Number of times `operation` was called, including failed calls.
    pub fn calls(&self, operation: Operation) -> usize {
        self.scripts
            .lock()
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default()
    }

    /// Makes the next `times` calls of `operation` fail with a network error.
    pub fn fail_next(&self, operation: Operation, times: usize) {
        self.push_script(operation, Script::Fail, times);
    }

    /// Makes the next `times` calls of `operation` never complete.
    pub fn stall_next(&self, operation: Operation, times: usize) {
        self.push_script(operation, Script::Stall, times);
    }

    /// Nonce the next submission will use.
    pub async fn nonce(&self) -> u64 {
        self.batch.lock().await.nonce
    }

    fn push_script(&self, operation: Operation, script: Script, times: usize) {
        self.scripts
            .lock()
            .pending
            .entry(operation)
            .or_default()
            .extend(std::iter::repeat_n(script, times));
    }

    async fn enter(&self, operation: Operation) -> Result<(), SdkError> {
        let script = self.scripts.lock().begin(operation);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match script {
            None => Ok(()),
            Some(Script::Fail) => Err(SdkError::Network(format!(
                "{operation:?}: connection reset by peer"
            ))),
            Some(Script::Stall) => std::future::pending().await,
        }
    }

    fn check_chain(&self, chain_id: u64) -> Result<(), SdkError> {
        if chain_id == self.network.chain_id() {
            Ok(())
        } else {
            Err(SdkError::UnsupportedNetwork(chain_id))
        }
    }
}

fn sign(digest: B256, signer: Address) -> Bytes {
    let mut preimage = digest.to_vec();
    preimage.extend_from_slice(signer.as_slice());
    let r = keccak256(&preimage);
    let s = keccak256(r);
    let mut signature = Vec::with_capacity(65);
    signature.extend_from_slice(r.as_slice());
    signature.extend_from_slice(s.as_slice());
    signature.push(27);
    Bytes::from(signature)
}

#[async_trait]
impl WalletSdk for MockWallet {
    fn network(&self) -> Network {
        self.network
    }

    fn account_address(&self) -> Address {
        self.account
    }

    async fn smart_account_address(&self) -> Result<Address, SdkError> {
        self.enter(Operation::SmartAccount).await?;
        Ok(self.smart_account)
    }

    async fn balances(&self, chain_id: u64) -> Result<Vec<BalanceEntry>, SdkError> {
        self.enter(Operation::Balances).await?;
        self.check_chain(chain_id)?;
        Ok(self.balances.clone())
    }

    async fn exchange_offers(&self, request: &ExchangeRequest) -> Result<Vec<Offer>, SdkError> {
        self.enter(Operation::ExchangeOffers).await?;
        request.validate()?;
        if request.is_cross_chain() {
            return Err(SdkError::validation(
                "toChainId",
                "exchange offers are same-chain only",
            ));
        }
        if let Some(chain_id) = request.from_chain_id {
            self.check_chain(chain_id)?;
        }
        Ok(self.offers.clone())
    }

    async fn cross_chain_quotes(
        &self,
        request: &ExchangeRequest,
    ) -> Result<Vec<Offer>, SdkError> {
        self.enter(Operation::CrossChainQuotes).await?;
        request.validate()?;
        if !request.is_cross_chain() {
            return Err(SdkError::validation(
                "toChainId",
                "a cross-chain quote needs two different chains",
            ));
        }
        Ok(self.quotes.clone())
    }

    async fn advance_routes(&self, request: &ExchangeRequest) -> Result<Vec<Offer>, SdkError> {
        self.enter(Operation::AdvanceRoutes).await?;
        request.validate()?;
        Ok(self.routes.clone())
    }

    async fn add_to_batch(
        &self,
        transaction: TransactionDescriptor,
    ) -> Result<Vec<TransactionDescriptor>, SdkError> {
        self.enter(Operation::AddToBatch).await?;
        let mut batch = self.batch.lock().await;
        batch.transactions.push(transaction);
        batch.estimate = None;
        Ok(batch.transactions.clone())
    }

    async fn estimate_batch(&self) -> Result<BatchEstimate, SdkError> {
        self.enter(Operation::EstimateBatch).await?;
        let mut batch = self.batch.lock().await;
        if batch.transactions.is_empty() {
            return Err(SdkError::EmptyBatch);
        }
        if let Some(transaction) = batch
            .transactions
            .iter()
            .find(|transaction| self.reverting.contains(&transaction.to))
        {
            return Err(SdkError::WouldRevert {
                reason: format!("call to {} reverted", transaction.to),
            });
        }

        let count = batch.transactions.len() as u64;
        let gas_limit = U256::from(BASE_GAS + GAS_PER_TRANSACTION * count);
        let estimate = BatchEstimate {
            gas_limit,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            estimated_cost: gas_limit.saturating_mul(self.max_fee_per_gas),
        };
        batch.estimate = Some(estimate.clone());
        Ok(estimate)
    }

    async fn submit_batch(&self, options: SubmitOptions) -> Result<SubmissionReceipt, SdkError> {
        self.enter(Operation::SubmitBatch).await?;
        let mut batch = self.batch.lock().await;
        let estimate = batch.estimate.take().ok_or(SdkError::NotEstimated)?;

        let mut preimage = Vec::new();
        preimage.extend_from_slice(&batch.nonce.to_be_bytes());
        preimage.extend_from_slice(self.smart_account.as_slice());
        for transaction in &batch.transactions {
            preimage.extend_from_slice(transaction.to.as_slice());
            preimage.extend_from_slice(&transaction.value.to_be_bytes::<32>());
            preimage.extend_from_slice(&transaction.data);
        }
        let hash = keccak256(&preimage);

        let mut signatures = vec![sign(hash, self.account)];
        if options.guarded {
            signatures.push(sign(hash, self.smart_account));
        }

        let receipt = SubmissionReceipt {
            hash,
            nonce: batch.nonce,
            signatures,
            gas_limit: estimate.gas_limit,
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
            estimated_cost: estimate.estimated_cost,
        };
        batch.nonce += 1;
        batch.transactions.clear();
        Ok(receipt)
    }

    async fn clear_batch(&self) -> Result<(), SdkError> {
        self.enter(Operation::ClearBatch).await?;
        let mut batch = self.batch.lock().await;
        batch.transactions.clear();
        batch.estimate = None;
        Ok(())
    }
}

/// Builder for [`MockWallet`].
#[derive(Debug)]
pub struct MockWalletBuilder {
    network: Network,
    account: Address,
    smart_account: Option<Address>,
    balances: Vec<BalanceEntry>,
    offers: Vec<Offer>,
    quotes: Vec<Offer>,
    routes: Vec<Offer>,
    reverting: HashSet<Address>,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    latency: Duration,
    scripts: Scripts,
}

impl MockWalletBuilder {
    fn new(network: Network) -> Self {
        Self {
            network,
            account: Address::repeat_byte(0x11),
            smart_account: None,
            balances: Vec::new(),
            offers: Vec::new(),
            quotes: Vec::new(),
            routes: Vec::new(),
            reverting: HashSet::new(),
            max_fee_per_gas: U256::from(30_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_500_000_000u64),
            latency: Duration::ZERO,
            scripts: Scripts::default(),
        }
    }

    /// Sets the session's externally owned address.
    pub fn account(mut self, account: Address) -> Self {
        self.account = account;
        self
    }

    /// Sets the smart-account address. Defaults to one derived from the
    /// account address.
    pub fn smart_account(mut self, smart_account: Address) -> Self {
        self.smart_account = Some(smart_account);
        self
    }

    /// Reports a balance of `raw` units with `decimals` places.
    pub fn balance(mut self, asset: impl Into<AssetId>, raw: U256, decimals: u8) -> Self {
        self.balances.push(BalanceEntry {
            asset: asset.into(),
            raw_balance: raw,
            decimals,
        });
        self
    }

    /// Adds a same-chain exchange offer.
    pub fn offer(mut self, offer: Offer) -> Self {
        self.offers.push(offer);
        self
    }

    /// Adds a cross-chain quote.
    pub fn quote(mut self, quote: Offer) -> Self {
        self.quotes.push(quote);
        self
    }

    /// Adds an advanced route.
    pub fn route(mut self, route: Offer) -> Self {
        self.routes.push(route);
        self
    }

    /// Makes any batched call to `target` revert on estimation.
    pub fn revert_on(mut self, target: Address) -> Self {
        self.reverting.insert(target);
        self
    }

    /// Sets the fee fields reported by estimation.
    pub fn fees(mut self, max_fee_per_gas: U256, max_priority_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    /// Delays every call by `latency`.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fails the first `times` calls of `operation` with a network error.
    pub fn flaky(mut self, operation: Operation, times: usize) -> Self {
        self.scripts
            .pending
            .entry(operation)
            .or_default()
            .extend(std::iter::repeat_n(Script::Fail, times));
        self
    }

    /// Builds the session.
    pub fn build(self) -> MockWallet {
        let smart_account = self
            .smart_account
            .unwrap_or_else(|| Address::from_word(keccak256(self.account.as_slice())));
        MockWallet {
            network: self.network,
            account: self.account,
            smart_account,
            balances: self.balances,
            offers: self.offers,
            quotes: self.quotes,
            routes: self.routes,
            reverting: self.reverting,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            latency: self.latency,
            scripts: Mutex::new(self.scripts),
            batch: tokio::sync::Mutex::new(BatchState::default()),
        }
    }
}

/// Oracle with a fixed USD price per `(chain_id, token)`.
#[derive(Debug, Clone, Default)]
pub struct FixedPriceOracle {
    prices: HashMap<(u64, Address), f64>,
}

impl FixedPriceOracle {
    /// Creates an oracle without prices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the USD price of `token` on `chain_id`.
    pub fn price(mut self, chain_id: u64, token: Address, usd: f64) -> Self {
        self.prices.insert((chain_id, token), usd);
        self
    }
}

#[async_trait]
impl PriceOracle for FixedPriceOracle {
    async fn usd_price(&self, chain_id: u64, token: Address) -> Result<f64, SdkError> {
        self.prices
            .get(&(chain_id, token))
            .copied()
            .ok_or_else(|| SdkError::validation("token", format!("no price for {token} on chain {chain_id}")))
    }
}
