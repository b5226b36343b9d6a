use super::{amount, stablecoins, thresholds};
use sdk_smoke_core::HarnessEvent;
use sdk_smoke_gate::{AssetId, BalanceGate, BalanceSnapshot, GateEvent, Shortfall};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn gate() -> sdk_smoke_gate::BalanceGateBuilder {
    BalanceGate::builder()
        .name("sepolia")
        .thresholds(thresholds())
        .require_all(stablecoins())
}

#[test]
fn passed_listener_fires_for_funded_account() {
    let passed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&passed);
    let gate = gate()
        .on_passed(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .on_blocked(|_| panic!("funded account was blocked"))
        .build();

    let snapshot = BalanceSnapshot::new()
        .with(AssetId::Native, amount("2"))
        .with("USDC", amount("6"))
        .with("USDT", amount("6"));

    assert!(gate.check(&snapshot).is_eligible());
    assert_eq!(passed.load(Ordering::SeqCst), 1);
}

#[test]
fn blocked_listener_receives_shortfalls() {
    let seen: Arc<Mutex<Vec<Shortfall>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let gate = gate()
        .on_blocked(move |shortfalls| sink.lock().unwrap().extend_from_slice(shortfalls))
        .build();

    let snapshot = BalanceSnapshot::new()
        .with(AssetId::Native, amount("2"))
        .with("USDC", amount("5"))
        .with("USDT", amount("6"));

    let eligibility = gate.check(&snapshot);

    assert!(!eligibility.is_eligible());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Shortfall {
            asset: AssetId::token("USDC"),
            balance: amount("5"),
            minimum: amount("5"),
        }]
    );
}

#[test]
fn gate_decision_matches_free_function() {
    let gate = gate().build();
    let snapshot = BalanceSnapshot::new()
        .with(AssetId::Native, amount("1.5"))
        .with("USDC", amount("0"))
        .with("USDT", amount("10"));

    assert_eq!(
        gate.check(&snapshot),
        sdk_smoke_gate::evaluate(&snapshot, gate.thresholds(), gate.required_assets())
    );
    assert_eq!(gate.name(), "sepolia");
}

#[test]
fn blocked_event_describes_itself() {
    let event = GateEvent::Blocked {
        gate_name: "polygon".into(),
        timestamp: std::time::Instant::now(),
        shortfalls: Vec::new(),
    };

    assert_eq!(event.event_type(), "Blocked");
    assert_eq!(event.source_name(), "polygon");
}

#[test]
fn panicking_listener_does_not_change_the_decision() {
    let passed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&passed);
    let gate = gate()
        .on_passed(|| panic!("listener bug"))
        .on_passed(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let snapshot = BalanceSnapshot::new()
        .with(AssetId::Native, amount("2"))
        .with("USDC", amount("6"))
        .with("USDT", amount("6"));

    assert!(gate.check(&snapshot).is_eligible());
    assert_eq!(passed.load(Ordering::SeqCst), 1);
}
