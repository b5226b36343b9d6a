use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Networks the smoke suite runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Network {
    Ethereum,
    Polygon,
    Optimism,
    Arbitrum,
    Base,
    Gnosis,
    Avalanche,
    BnbChain,
    Sepolia,
}

impl Network {
    /// Every supported network.
    pub const ALL: [Network; 9] = [
        Network::Ethereum,
        Network::Polygon,
        Network::Optimism,
        Network::Arbitrum,
        Network::Base,
        Network::Gnosis,
        Network::Avalanche,
        Network::BnbChain,
        Network::Sepolia,
    ];

    /// EIP-155 chain id.
    pub const fn chain_id(self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Polygon => 137,
            Network::Optimism => 10,
            Network::Arbitrum => 42161,
            Network::Base => 8453,
            Network::Gnosis => 100,
            Network::Avalanche => 43114,
            Network::BnbChain => 56,
            Network::Sepolia => 11155111,
        }
    }

    /// Symbol of the native gas asset.
    pub const fn native_symbol(self) -> &'static str {
        match self {
            Network::Ethereum
            | Network::Optimism
            | Network::Arbitrum
            | Network::Base
            | Network::Sepolia => "ETH",
            Network::Polygon => "POL",
            Network::Gnosis => "XDAI",
            Network::Avalanche => "AVAX",
            Network::BnbChain => "BNB",
        }
    }

    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Polygon => "polygon",
            Network::Optimism => "optimism",
            Network::Arbitrum => "arbitrum",
            Network::Base => "base",
            Network::Gnosis => "gnosis",
            Network::Avalanche => "avalanche",
            Network::BnbChain => "bnb",
            Network::Sepolia => "sepolia",
        }
    }

    /// Looks a network up by chain id.
    pub fn from_chain_id(chain_id: u64) -> Result<Self, SdkError> {
        Self::ALL
            .into_iter()
            .find(|network| network.chain_id() == chain_id)
            .ok_or(SdkError::UnsupportedNetwork(chain_id))
    }

    /// Returns `true` for test networks.
    pub const fn is_testnet(self) -> bool {
        matches!(self, Network::Sepolia)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let network = match name.as_str() {
            "ethereum" | "mainnet" => Network::Ethereum,
            "polygon" | "matic" => Network::Polygon,
            "optimism" => Network::Optimism,
            "arbitrum" => Network::Arbitrum,
            "base" => Network::Base,
            "gnosis" | "xdai" => Network::Gnosis,
            "avalanche" | "avax" => Network::Avalanche,
            "bnb" | "bsc" | "binance" => Network::BnbChain,
            "sepolia" => Network::Sepolia,
            other => match other.parse::<u64>() {
                Ok(chain_id) => Network::from_chain_id(chain_id)?,
                Err(_) => return Err(SdkError::validation("network", format!("unknown network {s:?}"))),
            },
        };
        Ok(network)
    }
}

impl TryFrom<String> for Network {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Network> for String {
    fn from(value: Network) -> Self {
        value.name().to_string()
    }
}
