use crate::amount::Amount;
use crate::events::GateEvent;
use crate::snapshot::{AssetId, BalanceSnapshot};
#[cfg(feature = "metrics")]
use metrics::counter;
use sdk_smoke_core::events::{EventListeners, FnListener};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

static NATIVE: AssetId = AssetId::Native;

/// Minimum balances a funded test account must exceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityThresholds {
    /// Applies to [`AssetId::Native`].
    pub minimum_native_balance: Amount,
    /// Applies to every required token.
    pub minimum_token_balance: Amount,
}

impl EligibilityThresholds {
    /// Creates thresholds from the native and per-token minimums.
    pub fn new(minimum_native_balance: Amount, minimum_token_balance: Amount) -> Self {
        Self {
            minimum_native_balance,
            minimum_token_balance,
        }
    }

    /// Threshold that applies to `asset`.
    pub fn minimum_for(&self, asset: &AssetId) -> Amount {
        if asset.is_native() {
            self.minimum_native_balance
        } else {
            self.minimum_token_balance
        }
    }
}

/// A balance that did not exceed its threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub asset: AssetId,
    pub balance: Amount,
    pub minimum: Amount,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} balance {} does not exceed {}",
            self.asset, self.balance, self.minimum
        )
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible { shortfalls: Vec<Shortfall> },
}

impl Eligibility {
    /// Returns `true` if the scenario may run.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    /// The balances that blocked the scenario (empty when eligible).
    pub fn shortfalls(&self) -> &[Shortfall] {
        match self {
            Eligibility::Eligible => &[],
            Eligibility::Ineligible { shortfalls } => shortfalls,
        }
    }

    /// Human-readable skip notice, `None` when eligible.
    pub fn reason(&self) -> Option<String> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Ineligible { shortfalls } => Some(format!(
                "insufficient balance: {}",
                shortfalls
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Decides eligibility and reports every balance that falls short.
///
/// The native balance is always checked against
/// `minimum_native_balance`; each required token against
/// `minimum_token_balance`. Both comparisons are strict: a balance equal to
/// its threshold is a shortfall. Duplicate required assets are checked once.
pub fn evaluate<'a, I>(
    snapshot: &BalanceSnapshot,
    thresholds: &EligibilityThresholds,
    required_assets: I,
) -> Eligibility
where
    I: IntoIterator<Item = &'a AssetId>,
{
    let mut checked: Vec<&AssetId> = Vec::new();
    let mut shortfalls = Vec::new();

    for asset in std::iter::once(&NATIVE).chain(required_assets) {
        if checked.contains(&asset) {
            continue;
        }
        checked.push(asset);

        let balance = snapshot.balance_of(asset);
        let minimum = thresholds.minimum_for(asset);
        if balance <= minimum {
            shortfalls.push(Shortfall {
                asset: asset.clone(),
                balance,
                minimum,
            });
        }
    }

    if shortfalls.is_empty() {
        Eligibility::Eligible
    } else {
        Eligibility::Ineligible { shortfalls }
    }
}

/// Returns `true` iff the native balance and every required token balance
/// strictly exceed their thresholds. Missing assets count as zero.
///
/// ```
/// use sdk_smoke_gate::{is_eligible, Amount, AssetId, BalanceSnapshot, EligibilityThresholds};
///
/// let thresholds = EligibilityThresholds::new(Amount::from(1), Amount::from(5));
/// let required = [AssetId::token("USDC"), AssetId::token("USDT")];
///
/// let funded = BalanceSnapshot::new()
///     .with(AssetId::Native, Amount::from(2))
///     .with("USDC", Amount::from(6))
///     .with("USDT", Amount::from(6));
/// assert!(is_eligible(&funded, &thresholds, &required));
///
/// let drained = funded.clone().with("USDC", Amount::zero());
/// assert!(!is_eligible(&drained, &thresholds, &required));
/// ```
pub fn is_eligible<'a, I>(
    snapshot: &BalanceSnapshot,
    thresholds: &EligibilityThresholds,
    required_assets: I,
) -> bool
where
    I: IntoIterator<Item = &'a AssetId>,
{
    evaluate(snapshot, thresholds, required_assets).is_eligible()
}

/// A named gate with fixed thresholds and required assets.
///
/// Wraps [`evaluate`] with events, logging and metrics; the decision itself
/// stays a pure function of the snapshot.
pub struct BalanceGate {
    name: String,
    thresholds: EligibilityThresholds,
    required_assets: Vec<AssetId>,
    event_listeners: EventListeners<GateEvent>,
}

impl BalanceGate {
    /// Creates a new gate builder.
    pub fn builder() -> BalanceGateBuilder {
        BalanceGateBuilder::new()
    }

    /// The thresholds this gate applies.
    pub fn thresholds(&self) -> &EligibilityThresholds {
        &self.thresholds
    }

    /// Tokens this gate requires besides the native asset.
    pub fn required_assets(&self) -> &[AssetId] {
        &self.required_assets
    }

    /// The gate's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates `snapshot` and reports the decision.
    pub fn check(&self, snapshot: &BalanceSnapshot) -> Eligibility {
        let eligibility = evaluate(snapshot, &self.thresholds, &self.required_assets);

        match &eligibility {
            Eligibility::Eligible => {
                self.publish(GateEvent::Passed {
                    gate_name: self.name.clone(),
                    timestamp: Instant::now(),
                });

                #[cfg(feature = "metrics")]
                counter!("gate_checks_total", "gate" => self.name.clone(), "result" => "eligible")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(gate = %self.name, "balances sufficient");
            }
            Eligibility::Ineligible { shortfalls } => {
                self.publish(GateEvent::Blocked {
                    gate_name: self.name.clone(),
                    timestamp: Instant::now(),
                    shortfalls: shortfalls.clone(),
                });

                #[cfg(feature = "metrics")]
                counter!("gate_checks_total", "gate" => self.name.clone(), "result" => "ineligible")
                    .increment(1);

                #[cfg(feature = "tracing")]
                info!(gate = %self.name, shortfalls = shortfalls.len(), "balances insufficient, scenario will be skipped");
            }
        }

        eligibility
    }

    fn publish(&self, event: GateEvent) {
        let notified = self.event_listeners.emit(&event);

        #[cfg(feature = "tracing")]
        if notified < self.event_listeners.len() {
            warn!(
                gate = %self.name,
                panicked = self.event_listeners.len() - notified,
                "gate listener panicked"
            );
        }
        #[cfg(not(feature = "tracing"))]
        let _ = notified;
    }
}

impl fmt::Debug for BalanceGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalanceGate")
            .field("name", &self.name)
            .field("thresholds", &self.thresholds)
            .field("required_assets", &self.required_assets)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BalanceGate`].
pub struct BalanceGateBuilder {
    name: String,
    thresholds: EligibilityThresholds,
    required_assets: Vec<AssetId>,
    event_listeners: EventListeners<GateEvent>,
}

impl Default for BalanceGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceGateBuilder {
    /// Creates a builder with zero thresholds and no required tokens.
    pub fn new() -> Self {
        Self {
            name: "<unnamed>".to_string(),
            thresholds: EligibilityThresholds::default(),
            required_assets: Vec::new(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the gate name used in events, logs and metrics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the thresholds.
    pub fn thresholds(mut self, thresholds: EligibilityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Adds a required asset.
    pub fn require(mut self, asset: impl Into<AssetId>) -> Self {
        self.required_assets.push(asset.into());
        self
    }

    /// Adds several required assets.
    pub fn require_all<I, A>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AssetId>,
    {
        self.required_assets
            .extend(assets.into_iter().map(Into::into));
        self
    }

    /// Registers a callback invoked when the gate blocks a scenario.
    pub fn on_blocked<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Shortfall]) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let GateEvent::Blocked { shortfalls, .. } = event {
                f(shortfalls);
            }
        }));
        self
    }

    /// Registers a callback invoked when the gate lets a scenario run.
    pub fn on_passed<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, GateEvent::Passed { .. }) {
                f();
            }
        }));
        self
    }

    /// Builds the gate.
    pub fn build(self) -> BalanceGate {
        BalanceGate {
            name: self.name,
            thresholds: self.thresholds,
            required_assets: self.required_assets,
            event_listeners: self.event_listeners,
        }
    }
}
