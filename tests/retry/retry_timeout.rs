//! Per-attempt timeouts.

use sdk_smoke_client::{MockWallet, Network, Operation, SdkError, WalletSdk};
use sdk_smoke_core::AttemptTimeout;
use sdk_smoke_retry::{run_with_retry, RetryConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn bounded(max_attempts: usize, timeout: Duration) -> RetryConfig<SdkError> {
    RetryConfig::builder()
        .max_attempts(max_attempts)
        .no_delay()
        .attempt_timeout(timeout)
        .retry_transient_only()
        .build()
}

#[tokio::test(start_paused = true)]
async fn stalled_call_fails_with_timeout_after_every_attempt() {
    let wallet = MockWallet::builder(Network::Sepolia).build();
    wallet.stall_next(Operation::SmartAccount, 10);

    let start = Instant::now();
    let result = run_with_retry(
        || wallet.smart_account_address(),
        &bounded(3, Duration::from_secs(5)),
    )
    .await;

    assert_eq!(
        result,
        Err(SdkError::TimedOut(AttemptTimeout {
            attempt: 3,
            timeout: Duration::from_secs(5),
        }))
    );
    assert_eq!(wallet.calls(Operation::SmartAccount), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn attempt_after_a_stall_can_succeed() {
    let wallet = MockWallet::builder(Network::Sepolia).build();
    wallet.stall_next(Operation::SmartAccount, 1);

    let result = run_with_retry(
        || wallet.smart_account_address(),
        &bounded(3, Duration::from_secs(5)),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(wallet.calls(Operation::SmartAccount), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_but_timely_calls_are_not_cut_off() {
    let wallet = MockWallet::builder(Network::Sepolia)
        .latency(Duration::from_secs(4))
        .build();

    let result = run_with_retry(
        || wallet.smart_account_address(),
        &bounded(1, Duration::from_secs(5)),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn timeouts_are_reported_to_listeners() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = RetryConfig::builder()
        .max_attempts(2)
        .no_delay()
        .attempt_timeout(Duration::from_millis(200))
        .on_attempt_timeout(move |attempt, timeout| sink.lock().unwrap().push((attempt, timeout)))
        .build();

    let wallet = MockWallet::builder(Network::Sepolia).build();
    wallet.stall_next(Operation::Balances, 2);

    let result = run_with_retry(|| wallet.balances(Network::Sepolia.chain_id()), &config).await;

    assert!(matches!(result, Err(SdkError::TimedOut(_))));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (1, Duration::from_millis(200)),
            (2, Duration::from_millis(200))
        ]
    );
}
