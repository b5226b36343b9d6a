//! Scenario tests.
//!
//! - offers.rs: exchange offers, cross-chain quotes and routes
//! - batch.rs: batch ordering rules and receipts
//! - rates.rs: offer rates against oracle prices
//! - validation.rs: malformed requests
//! - gating.rs: skips, retries and the suite report

mod batch;
mod rates;

use alloy_primitives::{Address, Bytes, U256};
use sdk_smoke::{RetrySettings, ScenarioRunner, SuiteConfig, SuiteContext};
use sdk_smoke_client::{
    ExchangeRequest, MockWallet, MockWalletBuilder, Network, Offer, TransactionDescriptor,
};
use sdk_smoke_gate::{AssetId, EligibilityThresholds};

pub(crate) const WETH: Address = Address::repeat_byte(0xbb);
pub(crate) const USDC: Address = Address::repeat_byte(0xaa);
pub(crate) const ROUTER: Address = Address::repeat_byte(0xcc);

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub(crate) fn units(whole: u64, decimals: u8) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(decimals))
}

/// Sepolia suite: native above 0.01, USDC above 5, three attempts, no delay.
pub(crate) fn config() -> SuiteConfig {
    SuiteConfig {
        network: Network::Sepolia,
        thresholds: EligibilityThresholds::new("0.01".parse().unwrap(), "5".parse().unwrap()),
        required_assets: vec![AssetId::token("USDC")],
        retry: RetrySettings {
            max_attempts: 3,
            delay_ms: 0,
            attempt_timeout_ms: None,
        },
        rate_tolerance: 0.05,
    }
}

pub(crate) fn runner() -> ScenarioRunner {
    ScenarioRunner::new(config().retry)
}

pub(crate) fn swap_offer(provider: &str, usdc_received: u64) -> Offer {
    Offer {
        provider: provider.to_string(),
        receive_amount: units(usdc_received, 6),
        exchange_rate: None,
        transactions: vec![TransactionDescriptor {
            to: ROUTER,
            data: Bytes::from_static(&[0x12, 0x34, 0x56, 0x78]),
            value: U256::ZERO,
        }],
    }
}

/// One WETH for USDC on Sepolia.
pub(crate) fn weth_to_usdc() -> ExchangeRequest {
    ExchangeRequest::new(WETH, USDC, units(1, 18))
}

pub(crate) fn funded() -> MockWalletBuilder {
    MockWallet::builder(Network::Sepolia)
        .balance(AssetId::Native, units(1, 18), 18)
        .balance("USDC", units(100, 6), 6)
}

pub(crate) fn dry() -> MockWalletBuilder {
    MockWallet::builder(Network::Sepolia)
        .balance(AssetId::Native, units(1, 18), 18)
        .balance("USDC", U256::ZERO, 6)
}

pub(crate) async fn context(wallet: MockWalletBuilder) -> SuiteContext<MockWallet> {
    init_tracing();
    SuiteContext::setup(wallet.build(), &config()).await.unwrap()
}
