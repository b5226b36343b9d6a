use crate::config::SuiteConfig;
use alloy_primitives::Address;
use sdk_smoke_client::{Network, SdkError, WalletSdk};
use sdk_smoke_core::HarnessError;
use sdk_smoke_gate::{BalanceGate, BalanceSnapshot, Eligibility};
use tracing::{debug, info};

/// Per-test fixture built by [`SuiteContext::setup`].
///
/// Holds the session together with everything the setup hook resolved for
/// it. Each test case builds its own context; nothing is shared between
/// test cases through globals.
#[derive(Debug)]
pub struct SuiteContext<S> {
    sdk: S,
    smart_account: Address,
    snapshot: BalanceSnapshot,
    eligibility: Eligibility,
}

impl<S: WalletSdk> SuiteContext<S> {
    /// Resolves the smart account, reads its balances and evaluates the
    /// balance gate. Both calls are retried with the suite's settings.
    pub async fn setup(sdk: S, config: &SuiteConfig) -> Result<Self, HarnessError<SdkError>> {
        let network = sdk.network();
        if network != config.network {
            return Err(HarnessError::Call(SdkError::validation(
                "network",
                format!("session is on {network}, suite targets {}", config.network),
            )));
        }

        let smart_account = config
            .retry
            .builder::<SdkError>()
            .name("setup.smart_account")
            .build()
            .run(|| sdk.smart_account_address())
            .await
            .map_err(HarnessError::Call)?;

        let entries = config
            .retry
            .builder::<SdkError>()
            .name("setup.balances")
            .build()
            .run(|| sdk.balances(network.chain_id()))
            .await
            .map_err(HarnessError::Call)?;

        let snapshot = BalanceSnapshot::from_entries(
            entries
                .into_iter()
                .map(|entry| (entry.asset, entry.raw_balance, entry.decimals)),
        )
        .map_err(|err| HarnessError::Call(SdkError::validation("balances", err.to_string())))?;

        let gate = BalanceGate::builder()
            .name(network.name())
            .thresholds(config.thresholds.clone())
            .require_all(config.required_assets.iter().cloned())
            .build();
        let eligibility = gate.check(&snapshot);

        debug!(
            %network,
            native = network.native_symbol(),
            testnet = network.is_testnet(),
            account = %sdk.account_address(),
            %smart_account,
            assets = snapshot.len(),
            "suite context ready"
        );
        if let Some(reason) = eligibility.reason() {
            info!(%network, %smart_account, %reason, "scenarios spending funds will be skipped");
        }

        Ok(Self {
            sdk,
            smart_account,
            snapshot,
            eligibility,
        })
    }
}

impl<S> SuiteContext<S> {
    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn smart_account(&self) -> Address {
        self.smart_account
    }

    pub fn snapshot(&self) -> &BalanceSnapshot {
        &self.snapshot
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    /// Whether scenarios that spend funds may run.
    pub fn is_eligible(&self) -> bool {
        self.eligibility.is_eligible()
    }

    /// Why scenarios are skipped, if they are.
    pub fn skip_reason(&self) -> Option<String> {
        self.eligibility.reason()
    }
}

impl<S: WalletSdk> SuiteContext<S> {
    pub fn network(&self) -> Network {
        self.sdk.network()
    }
}
