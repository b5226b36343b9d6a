//! Retry metrics regression tests

use super::helpers::*;
use sdk_smoke_client::{MockWallet, Network, Operation, SdkError, WalletSdk};
use sdk_smoke_retry::{run_with_retry, RetryConfig};
use serial_test::serial;
use tower::{Service, ServiceExt};

#[tokio::test]
#[serial]
async fn retry_metrics_exist() {
    init_recorder();

    let wallet = MockWallet::builder(Network::Sepolia)
        .flaky(Operation::SmartAccount, 2)
        .build();
    let config = RetryConfig::<SdkError>::builder()
        .name("metrics_smart_account")
        .max_attempts(3)
        .no_delay()
        .build();

    run_with_retry(|| wallet.smart_account_address(), &config)
        .await
        .unwrap();

    assert_counter_exists("retry_calls_total");
    assert_metric_has_label("retry_calls_total", "retry", "metrics_smart_account");
    assert_metric_has_label("retry_calls_total", "result", "success");

    assert_counter_exists("retry_attempts_total");
    assert_metric_has_label("retry_attempts_total", "retry", "metrics_smart_account");

    assert_histogram_exists("retry_attempts");
    assert_metric_has_label("retry_attempts", "retry", "metrics_smart_account");
}

#[tokio::test]
#[serial]
async fn exhausted_and_ignored_results_are_labelled() {
    init_recorder();

    let wallet = MockWallet::builder(Network::Sepolia)
        .flaky(Operation::Balances, 5)
        .build();
    let exhausted = RetryConfig::<SdkError>::builder()
        .name("metrics_balances")
        .max_attempts(2)
        .no_delay()
        .build();
    let _ = run_with_retry(|| wallet.balances(Network::Sepolia.chain_id()), &exhausted).await;
    assert_metric_has_label("retry_calls_total", "result", "exhausted");

    let ignored = RetryConfig::<SdkError>::builder()
        .name("metrics_estimate")
        .no_delay()
        .retry_transient_only()
        .build();
    let _ = run_with_retry(|| wallet.estimate_batch(), &ignored).await;
    assert_metric_has_label("retry_calls_total", "retry", "metrics_estimate");
    assert_metric_has_label("retry_calls_total", "result", "ignored");
}

#[tokio::test]
#[serial]
async fn service_form_records_the_same_metrics() {
    init_recorder();

    let attempts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = attempts.clone();
    let inner = tower::service_fn(move |_: ()| {
        let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        async move {
            if n == 0 {
                Err(SdkError::RateLimited)
            } else {
                Ok(n)
            }
        }
    });
    let layer = RetryConfig::<SdkError>::builder()
        .name("metrics_service")
        .no_delay()
        .build()
        .layer();

    let mut service = tower::Layer::layer(&layer, inner);
    service.ready().await.unwrap().call(()).await.unwrap();

    assert_metric_has_label("retry_calls_total", "retry", "metrics_service");
    assert_metric_has_label("retry_attempts_total", "retry", "metrics_service");
}
