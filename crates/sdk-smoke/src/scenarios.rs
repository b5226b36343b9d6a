//! Smoke scenarios shared by every network's test file.
//!
//! Each scenario fetches through the [`ScenarioRunner`] (retried, gated on
//! balances) and checks the response shape in a [`CheckReport`].

use crate::context::SuiteContext;
use crate::report::CheckReport;
use crate::runner::{Outcome, ScenarioRunner};
use alloy_primitives::{Address, B256, U256};
use sdk_smoke_client::{
    BatchEstimate, ExchangeRequest, Offer, PriceOracle, SdkError, SubmissionReceipt,
    SubmitOptions, TransactionDescriptor, WalletSdk,
};
use sdk_smoke_core::Classify;
use sdk_smoke_gate::Amount;

/// Keeps a non-transient error as an observation instead of a failure.
///
/// Transient errors stay errors so the runner retries them.
fn observe<T>(result: Result<T, SdkError>) -> Result<Result<T, SdkError>, SdkError> {
    match result {
        Err(error) if error.is_transient() => Err(error),
        other => Ok(other),
    }
}

async fn offers_for<S: WalletSdk>(sdk: &S, request: &ExchangeRequest) -> Result<Vec<Offer>, SdkError> {
    if request.is_cross_chain() {
        sdk.cross_chain_quotes(request).await
    } else {
        sdk.exchange_offers(request).await
    }
}

/// Checks the shape every offer, quote and route must have.
pub fn check_offers(offers: &[Offer], report: &mut CheckReport) {
    report.check_non_empty("offers returned", offers);
    for (i, offer) in offers.iter().enumerate() {
        report.check(
            format!("offer {i} provider"),
            !offer.provider.trim().is_empty(),
            "provider name is empty",
        );
        report.check(
            format!("offer {i} receive amount"),
            !offer.receive_amount.is_zero(),
            "receive amount is zero",
        );
        report.check_non_empty(format!("offer {i} transactions"), &offer.transactions);
        for (j, transaction) in offer.transactions.iter().enumerate() {
            report.check(
                format!("offer {i} transaction {j} target"),
                transaction.to != Address::ZERO,
                "targets the zero address",
            );
        }
    }
}

/// Same-chain exchange offers.
pub async fn exchange_offers<S: WalletSdk>(
    runner: &ScenarioRunner,
    ctx: &SuiteContext<S>,
    request: &ExchangeRequest,
) -> Outcome<SdkError> {
    runner
        .run(
            "exchange_offers",
            ctx,
            || ctx.sdk().exchange_offers(request),
            |offers, report| check_offers(offers, report),
        )
        .await
}

/// Cross-chain bridge quotes.
pub async fn cross_chain_quotes<S: WalletSdk>(
    runner: &ScenarioRunner,
    ctx: &SuiteContext<S>,
    request: &ExchangeRequest,
) -> Outcome<SdkError> {
    runner
        .run(
            "cross_chain_quotes",
            ctx,
            || ctx.sdk().cross_chain_quotes(request),
            |quotes, report| {
                report.check(
                    "request spans two chains",
                    request.is_cross_chain(),
                    format_args!(
                        "from {:?} to {:?}",
                        request.from_chain_id, request.to_chain_id
                    ),
                );
                check_offers(quotes, report);
            },
        )
        .await
}

/// Routes from the advanced routing provider.
pub async fn advance_routes<S: WalletSdk>(
    runner: &ScenarioRunner,
    ctx: &SuiteContext<S>,
    request: &ExchangeRequest,
) -> Outcome<SdkError> {
    runner
        .run(
            "advance_routes",
            ctx,
            || ctx.sdk().advance_routes(request),
            |routes, report| check_offers(routes, report),
        )
        .await
}

/// Everything observed while walking a batch through its lifecycle.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub empty_estimate: Result<BatchEstimate, SdkError>,
    pub early_submit: Result<SubmissionReceipt, SdkError>,
    pub batch: Vec<TransactionDescriptor>,
    pub estimate: BatchEstimate,
    pub receipt: SubmissionReceipt,
}

/// Batch ordering rules and receipt consistency.
///
/// Starting from a cleared batch: estimating it fails as empty, submitting
/// it fails as not estimated, and after adding `transactions` an estimate
/// and a submission succeed with a receipt echoing the estimate.
///
/// The walk starts with a clear, so a retried attempt starts from the same
/// state. A submission whose receipt was lost is not detected.
pub async fn batch_lifecycle<S: WalletSdk>(
    runner: &ScenarioRunner,
    ctx: &SuiteContext<S>,
    transactions: &[TransactionDescriptor],
    options: SubmitOptions,
) -> Outcome<SdkError> {
    runner
        .run(
            "batch_lifecycle",
            ctx,
            || async move {
                let sdk = ctx.sdk();
                sdk.clear_batch().await?;
                let empty_estimate = observe(sdk.estimate_batch().await)?;
                let early_submit = observe(sdk.submit_batch(options).await)?;

                let mut batch = Vec::new();
                for transaction in transactions {
                    batch = sdk.add_to_batch(transaction.clone()).await?;
                }
                let estimate = sdk.estimate_batch().await?;
                let receipt = sdk.submit_batch(options).await?;

                Ok::<_, SdkError>(BatchRun {
                    empty_estimate,
                    early_submit,
                    batch,
                    estimate,
                    receipt,
                })
            },
            |run, report| check_batch_run(run, transactions, options, report),
        )
        .await
}

/// Checks a [`BatchRun`].
pub fn check_batch_run(
    run: &BatchRun,
    transactions: &[TransactionDescriptor],
    options: SubmitOptions,
    report: &mut CheckReport,
) {
    report.check(
        "empty batch estimate fails as empty",
        matches!(run.empty_estimate, Err(SdkError::EmptyBatch)),
        format_args!("got {:?}", run.empty_estimate),
    );
    report.check(
        "submit before estimate fails as not estimated",
        matches!(run.early_submit, Err(SdkError::NotEstimated)),
        format_args!("got {:?}", run.early_submit),
    );
    report.check_eq("batch contents", run.batch.as_slice(), transactions);
    report.check(
        "estimated gas limit",
        run.estimate.gas_limit > U256::ZERO,
        "gas limit is zero",
    );
    report.check(
        "receipt echoes estimate",
        run.receipt.matches_estimate(&run.estimate),
        format_args!("estimate {:?}, receipt {:?}", run.estimate, run.receipt),
    );
    report.check(
        "receipt hash",
        run.receipt.hash != B256::ZERO,
        "hash is zero",
    );
    let required_signatures = if options.guarded { 2 } else { 1 };
    report.check(
        "receipt signatures",
        run.receipt.signatures.len() >= required_signatures,
        format_args!(
            "expected at least {required_signatures}, got {}",
            run.receipt.signatures.len()
        ),
    );
}

/// An exchange request together with the decimals of both tokens.
#[derive(Debug, Clone)]
pub struct RateCheck {
    pub request: ExchangeRequest,
    pub from_decimals: u8,
    pub to_decimals: u8,
}

fn whole_units(raw: U256, decimals: u8) -> Option<f64> {
    Amount::from_raw(raw, decimals).ok()?.to_string().parse().ok()
}

/// Rate an offer implies: the quoted one, else received over sent.
pub fn offer_rate(offer: &Offer, check: &RateCheck) -> Option<f64> {
    if let Some(rate) = offer.exchange_rate {
        return Some(rate);
    }
    let sent = whole_units(check.request.from_amount, check.from_decimals)?;
    let received = whole_units(offer.receive_amount, check.to_decimals)?;
    (sent > 0.0).then(|| received / sent)
}

/// Compares each offer's rate to the ratio of oracle USD prices.
///
/// A rate passes when it deviates from the oracle ratio by at most
/// `tolerance`, relative to the oracle ratio.
pub async fn rate_cross_check<S, O>(
    runner: &ScenarioRunner,
    ctx: &SuiteContext<S>,
    oracle: &O,
    check: &RateCheck,
    tolerance: f64,
) -> Outcome<SdkError>
where
    S: WalletSdk,
    O: PriceOracle + ?Sized,
{
    let request = &check.request;
    let from_chain = request.from_chain_id.unwrap_or(ctx.network().chain_id());
    let to_chain = request.to_chain_id.unwrap_or(from_chain);

    runner
        .run(
            "rate_cross_check",
            ctx,
            || async move {
                let offers = offers_for(ctx.sdk(), request).await?;
                let from_price = oracle.usd_price(from_chain, request.from_token).await?;
                let to_price = oracle.usd_price(to_chain, request.to_token).await?;
                Ok::<_, SdkError>((offers, from_price / to_price))
            },
            |(offers, expected), report| {
                report.check_non_empty("offers returned", offers);
                if !report.check(
                    "oracle ratio",
                    expected.is_finite() && *expected > 0.0,
                    format_args!("ratio is {expected}"),
                ) {
                    return;
                }
                for (i, offer) in offers.iter().enumerate() {
                    let Some(rate) =
                        report.check_some(format!("offer {i} rate"), &offer_rate(offer, check)).copied()
                    else {
                        continue;
                    };
                    let deviation = (rate / expected - 1.0).abs();
                    report.check(
                        format!("offer {i} rate within tolerance"),
                        deviation <= tolerance,
                        format_args!(
                            "{} rate {rate} deviates {:.2}% from oracle {expected}",
                            offer.provider,
                            deviation * 100.0
                        ),
                    );
                }
            },
        )
        .await
}

/// A malformed request is rejected as a validation error naming
/// `expected_field`, after a single call.
///
/// Spends nothing, so it runs even when the balance gate is closed.
pub async fn invalid_request<S: WalletSdk>(
    runner: &ScenarioRunner,
    ctx: &SuiteContext<S>,
    request: &ExchangeRequest,
    expected_field: &str,
) -> Outcome<SdkError> {
    runner
        .run_ungated(
            "invalid_request",
            || async move { observe(offers_for(ctx.sdk(), request).await) },
            |result, report| match result {
                Err(SdkError::Validation { field, .. }) => {
                    report.check_eq("rejected field", field.as_str(), expected_field);
                }
                Err(other) => {
                    report.check(
                        "rejected as validation error",
                        false,
                        format_args!("got {other}"),
                    );
                }
                Ok(offers) => {
                    report.check(
                        "request rejected",
                        false,
                        format_args!("accepted with {} offer(s)", offers.len()),
                    );
                }
            },
        )
        .await
}
