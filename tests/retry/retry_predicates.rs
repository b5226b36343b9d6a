//! Which errors are retried.

use sdk_smoke_client::{MockWallet, Network, Operation, SdkError, WalletSdk};
use sdk_smoke_core::{Classify, FailureKind};
use sdk_smoke_retry::{run_with_retry, RetryConfig};
use std::sync::atomic::{AtomicUsize, Ordering};

fn transient_only(max_attempts: usize) -> RetryConfig<SdkError> {
    RetryConfig::builder()
        .max_attempts(max_attempts)
        .no_delay()
        .retry_transient_only()
        .build()
}

#[tokio::test]
async fn network_outage_is_retried() {
    let wallet = MockWallet::builder(Network::Sepolia)
        .flaky(Operation::SmartAccount, 2)
        .build();

    let result = run_with_retry(|| wallet.smart_account_address(), &transient_only(3)).await;

    assert!(result.is_ok());
    assert_eq!(wallet.calls(Operation::SmartAccount), 3);
}

#[tokio::test]
async fn validation_error_is_not_retried() {
    let wallet = MockWallet::builder(Network::Sepolia).build();

    let result = run_with_retry(|| wallet.balances(Network::Polygon.chain_id()), &transient_only(5)).await;

    assert!(matches!(result, Err(ref e) if e.failure_kind() != FailureKind::Transient));
    assert_eq!(wallet.calls(Operation::Balances), 1);
}

#[tokio::test]
async fn empty_batch_is_not_retried() {
    let wallet = MockWallet::builder(Network::Sepolia).build();

    let result = run_with_retry(|| wallet.estimate_batch(), &transient_only(3)).await;

    assert_eq!(result, Err(SdkError::EmptyBatch));
    assert_eq!(wallet.calls(Operation::EstimateBatch), 1);
}

#[tokio::test]
async fn default_policy_retries_everything() {
    let wallet = MockWallet::builder(Network::Sepolia).build();
    let config = RetryConfig::builder().max_attempts(3).no_delay().build();

    let result = run_with_retry(|| wallet.estimate_batch(), &config).await;

    assert_eq!(result, Err(SdkError::EmptyBatch));
    assert_eq!(wallet.calls(Operation::EstimateBatch), 3);
}

#[tokio::test]
async fn custom_predicate_decides_per_error() {
    let calls = AtomicUsize::new(0);
    let config = RetryConfig::builder()
        .max_attempts(5)
        .no_delay()
        .retry_on(|e: &SdkError| matches!(e, SdkError::RateLimited))
        .build();

    let result: Result<(), SdkError> = run_with_retry(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(SdkError::RateLimited)
                } else {
                    Err(SdkError::Network("reset".into()))
                }
            }
        },
        &config,
    )
    .await;

    assert_eq!(result, Err(SdkError::Network("reset".into())));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
