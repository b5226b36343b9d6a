use crate::amount::{Amount, AmountParseError};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identifies an asset held by the test account.
///
/// Token identifiers are symbols or address strings and are compared
/// case-insensitively (`"usdc"` and `"USDC"` are the same asset). The name
/// `native` is reserved for [`AssetId::Native`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum AssetId {
    /// The chain's native gas asset.
    Native,
    /// An ERC-20 style token.
    Token(TokenId),
}

/// Upper-cased token symbol or address; only built by [`AssetId::token`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(String);

impl TokenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const NATIVE: &str = "native";

impl AssetId {
    /// Creates a token identifier, normalising its case.
    ///
    /// `"native"` in any case yields [`AssetId::Native`], so every asset
    /// survives a trip through its string form.
    pub fn token(id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        if id.eq_ignore_ascii_case(NATIVE) {
            AssetId::Native
        } else {
            AssetId::Token(TokenId(id.to_ascii_uppercase()))
        }
    }

    /// Returns `true` for the native asset.
    pub fn is_native(&self) -> bool {
        matches!(self, AssetId::Native)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Native => f.write_str(NATIVE),
            AssetId::Token(id) => id.fmt(f),
        }
    }
}

impl FromStr for AssetId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AssetId::token(s))
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(asset) => asset,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        AssetId::from(value.to_string())
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.to_string()
    }
}

/// Balances of the test account, fetched once per test case.
///
/// Assets that were not reported have a balance of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    balances: BTreeMap<AssetId, Amount>,
}

impl BalanceSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from `(asset, raw_balance, decimals)` rows as the
    /// balance reader reports them.
    pub fn from_entries<I, A>(entries: I) -> Result<Self, AmountParseError>
    where
        I: IntoIterator<Item = (A, U256, u8)>,
        A: Into<AssetId>,
    {
        entries
            .into_iter()
            .map(|(asset, raw, decimals)| Ok((asset.into(), Amount::from_raw(raw, decimals)?)))
            .collect()
    }

    /// Adds or replaces the balance of `asset`.
    pub fn with(mut self, asset: impl Into<AssetId>, amount: Amount) -> Self {
        self.insert(asset, amount);
        self
    }

    /// Sets the balance of `asset`, replacing any earlier value.
    pub fn insert(&mut self, asset: impl Into<AssetId>, amount: Amount) {
        self.balances.insert(asset.into(), amount);
    }

    /// Balance of `asset`, zero if the asset was not reported.
    pub fn balance_of(&self, asset: &AssetId) -> Amount {
        self.balances.get(asset).copied().unwrap_or_default()
    }

    /// Iterates over the reported balances in asset order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Amount)> {
        self.balances.iter()
    }

    /// Number of reported assets.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Returns `true` if no asset was reported.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl FromIterator<(AssetId, Amount)> for BalanceSnapshot {
    fn from_iter<I: IntoIterator<Item = (AssetId, Amount)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}
