use super::{config, context, funded, runner, swap_offer, weth_to_usdc, USDC, WETH};
use sdk_smoke::scenarios::{self, RateCheck};
use sdk_smoke_client::{FixedPriceOracle, Network, Operation, SdkError};

fn oracle() -> FixedPriceOracle {
    let sepolia = Network::Sepolia.chain_id();
    FixedPriceOracle::new()
        .price(sepolia, WETH, 3000.0)
        .price(sepolia, USDC, 1.0)
}

fn weth_usdc() -> RateCheck {
    RateCheck {
        request: weth_to_usdc(),
        from_decimals: 18,
        to_decimals: 6,
    }
}

#[tokio::test]
async fn offers_near_oracle_ratio_pass() {
    let ctx = context(
        funded()
            .offer(swap_offer("1inch", 2990))
            .offer(swap_offer("paraswap", 3050)),
    )
    .await;

    let outcome =
        scenarios::rate_cross_check(&runner(), &ctx, &oracle(), &weth_usdc(), config().rate_tolerance)
            .await;

    assert!(outcome.is_passed(), "{outcome}");
}

#[tokio::test]
async fn outlier_offer_is_named() {
    let ctx = context(
        funded()
            .offer(swap_offer("1inch", 2990))
            .offer(swap_offer("shady", 2000)),
    )
    .await;

    let outcome =
        scenarios::rate_cross_check(&runner(), &ctx, &oracle(), &weth_usdc(), 0.05).await;

    let failures = outcome.error().unwrap().check_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name, "offer 1 rate within tolerance");
    assert!(failures[0].detail.starts_with("shady rate 2000"), "{}", failures[0].detail);
}

#[tokio::test]
async fn quoted_rate_takes_precedence() {
    let mut quoted = swap_offer("1inch", 1);
    quoted.exchange_rate = Some(2995.0);
    let ctx = context(funded().offer(quoted)).await;

    let outcome =
        scenarios::rate_cross_check(&runner(), &ctx, &oracle(), &weth_usdc(), 0.01).await;

    assert!(outcome.is_passed(), "{outcome}");
}

#[tokio::test]
async fn missing_oracle_price_fails_the_call() {
    let ctx = context(funded().offer(swap_offer("1inch", 2990))).await;
    let oracle = FixedPriceOracle::new().price(Network::Sepolia.chain_id(), WETH, 3000.0);

    let outcome =
        scenarios::rate_cross_check(&runner(), &ctx, &oracle, &weth_usdc(), 0.05).await;

    assert!(matches!(
        outcome.error().and_then(|e| e.call_error()),
        Some(SdkError::Validation { field, .. }) if field == "token"
    ));
    assert_eq!(ctx.sdk().calls(Operation::ExchangeOffers), 1);
}

#[test]
fn rate_is_derived_from_amounts_in_whole_units() {
    let offer = swap_offer("1inch", 2990);
    let rate = scenarios::offer_rate(&offer, &weth_usdc()).unwrap();
    assert!((rate - 2990.0).abs() < 1e-9, "{rate}");
}
