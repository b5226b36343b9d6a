use super::{context, funded, runner, ROUTER};
use alloy_primitives::{Address, U256};
use sdk_smoke::scenarios::{self, BatchRun};
use sdk_smoke::CheckReport;
use sdk_smoke_client::{
    BatchEstimate, Operation, SdkError, SubmissionReceipt, SubmitOptions, TransactionDescriptor,
    WalletSdk,
};

fn transfers() -> Vec<TransactionDescriptor> {
    vec![
        TransactionDescriptor::transfer(Address::repeat_byte(0x01), U256::from(1_000u64)),
        TransactionDescriptor::transfer(Address::repeat_byte(0x02), U256::from(2_000u64)),
    ]
}

#[tokio::test]
async fn lifecycle_passes_and_advances_nonce() {
    let ctx = context(funded()).await;

    let outcome =
        scenarios::batch_lifecycle(&runner(), &ctx, &transfers(), SubmitOptions::default()).await;

    assert!(outcome.is_passed(), "{outcome}");
    assert_eq!(ctx.sdk().nonce().await, 1);
    assert_eq!(ctx.sdk().calls(Operation::SubmitBatch), 2);
}

#[tokio::test]
async fn guarded_submission_needs_two_signatures() {
    let ctx = context(funded()).await;

    let outcome = scenarios::batch_lifecycle(
        &runner(),
        &ctx,
        &transfers(),
        SubmitOptions { guarded: true },
    )
    .await;

    assert!(outcome.is_passed(), "{outcome}");
}

#[tokio::test]
async fn leftover_batch_is_cleared_first() {
    let ctx = context(funded()).await;
    ctx.sdk()
        .add_to_batch(TransactionDescriptor::transfer(ROUTER, U256::from(1u64)))
        .await
        .unwrap();

    let outcome =
        scenarios::batch_lifecycle(&runner(), &ctx, &transfers(), SubmitOptions::default()).await;

    assert!(outcome.is_passed(), "{outcome}");
}

#[tokio::test]
async fn reverting_transaction_fails_without_retry() {
    let ctx = context(funded().revert_on(ROUTER)).await;
    let batch = vec![TransactionDescriptor::transfer(ROUTER, U256::from(5u64))];

    let outcome =
        scenarios::batch_lifecycle(&runner(), &ctx, &batch, SubmitOptions::default()).await;

    assert!(matches!(
        outcome.error().and_then(|e| e.call_error()),
        Some(SdkError::WouldRevert { .. })
    ));
    assert_eq!(ctx.sdk().calls(Operation::ClearBatch), 1);
    assert_eq!(ctx.sdk().calls(Operation::EstimateBatch), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_submit_restarts_the_whole_walk() {
    let ctx = context(funded().flaky(Operation::SubmitBatch, 1)).await;

    let outcome =
        scenarios::batch_lifecycle(&runner(), &ctx, &transfers(), SubmitOptions::default()).await;

    assert!(outcome.is_passed(), "{outcome}");
    assert_eq!(ctx.sdk().calls(Operation::ClearBatch), 2);
    assert_eq!(ctx.sdk().nonce().await, 1);
}

fn estimate() -> BatchEstimate {
    BatchEstimate {
        gas_limit: U256::from(131_000u64),
        max_fee_per_gas: U256::from(30u64),
        max_priority_fee_per_gas: U256::from(2u64),
        estimated_cost: U256::from(3_930_000u64),
    }
}

fn receipt(estimate: &BatchEstimate) -> SubmissionReceipt {
    SubmissionReceipt {
        hash: alloy_primitives::B256::repeat_byte(0x42),
        nonce: 0,
        signatures: vec![alloy_primitives::Bytes::from(vec![0u8; 65])],
        gas_limit: estimate.gas_limit,
        max_fee_per_gas: estimate.max_fee_per_gas,
        max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        estimated_cost: estimate.estimated_cost,
    }
}

#[test]
fn swapped_failure_modes_are_caught() {
    let estimate = estimate();
    let run = BatchRun {
        empty_estimate: Err(SdkError::NotEstimated),
        early_submit: Err(SdkError::EmptyBatch),
        batch: transfers(),
        receipt: receipt(&estimate),
        estimate,
    };

    let mut report = CheckReport::new();
    scenarios::check_batch_run(&run, &transfers(), SubmitOptions::default(), &mut report);

    let names: Vec<_> = report.failures().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "empty batch estimate fails as empty",
            "submit before estimate fails as not estimated"
        ]
    );
}

#[test]
fn receipt_fee_drift_is_caught() {
    let estimate = estimate();
    let mut drifted = receipt(&estimate);
    drifted.max_fee_per_gas = U256::from(31u64);
    let run = BatchRun {
        empty_estimate: Err(SdkError::EmptyBatch),
        early_submit: Err(SdkError::NotEstimated),
        batch: transfers(),
        receipt: drifted,
        estimate,
    };

    let mut report = CheckReport::new();
    scenarios::check_batch_run(&run, &transfers(), SubmitOptions { guarded: true }, &mut report);

    let names: Vec<_> = report.failures().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["receipt echoes estimate", "receipt signatures"]);
}
